use dotenv::dotenv;
use imperium_ai::shell::{self, Tab, TabRequest, APP_TAGLINE, APP_TITLE, UPLOAD_SUCCESS};
use imperium_ai::{CompletionClient, DocumentType, FundAgents, FundTable, ImperiumConfig};
use std::error::Error;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Prints `label` and reads one line. `None` on end of input.
fn ask(label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn load_upload(path: &str) -> Option<FundTable> {
    match FundTable::from_path(path) {
        Ok(table) => {
            println!("✅ {}", UPLOAD_SUCCESS);
            Some(table)
        }
        Err(e) => {
            eprintln!("❌ Could not read {}: {}", path, e);
            None
        }
    }
}

fn choose_document() -> io::Result<Option<DocumentType>> {
    println!("Choose document:");
    for (i, doc) in DocumentType::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, doc);
    }

    loop {
        let Some(choice) = ask("> ")? else {
            return Ok(None);
        };
        match DocumentType::from_choice(&choice) {
            Some(doc) => return Ok(Some(doc)),
            None => println!("Unknown document '{}'.", choice),
        }
    }
}

/// Collects the form fields for `tab`. `None` on end of input.
fn read_request(tab: Tab) -> io::Result<Option<TabRequest>> {
    let request = match tab {
        Tab::LegalOps => {
            let Some(doc_type) = choose_document()? else {
                return Ok(None);
            };
            let Some(context) = ask("Enter fund/legal context: ")? else {
                return Ok(None);
            };
            TabRequest::LegalOps { context, doc_type }
        }
        Tab::CfoOps => TabRequest::CfoOps,
        Tab::InvestorComms => {
            let Some(context) = ask("Enter LP context (fund strategy, update): ")? else {
                return Ok(None);
            };
            let Some(question) = ask("LP Question: ")? else {
                return Ok(None);
            };
            TabRequest::InvestorComms { context, question }
        }
        Tab::EsgIntelligence => {
            let Some(context) = ask("Describe ESG policy or impact: ")? else {
                return Ok(None);
            };
            TabRequest::EsgIntelligence { context }
        }
        Tab::RiskStrategy => TabRequest::RiskStrategy,
    };
    Ok(Some(request))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ImperiumConfig::from_env()?;
    let agents = FundAgents::new(CompletionClient::from_config(&config));

    println!("{}", APP_TITLE);
    println!("{}\n", APP_TAGLINE);

    let mut upload = match ask("Upload fund data (CSV path, blank to skip): ")? {
        Some(path) if !path.is_empty() => load_upload(&path),
        _ => None,
    };

    loop {
        println!("------------------------------------------------------------------");
        for (i, tab) in Tab::ALL.iter().enumerate() {
            println!("  {}. {}", i + 1, tab);
        }
        println!("  u. Upload fund data (CSV)");

        let Some(choice) = ask("Select a tab (type 'quit' to exit): ")? else {
            break;
        };

        if choice.eq_ignore_ascii_case("quit") || choice.eq_ignore_ascii_case("exit") {
            break;
        }

        if choice.eq_ignore_ascii_case("u") {
            if let Some(path) = ask("CSV path: ")? {
                if let Some(table) = load_upload(&path) {
                    upload = Some(table);
                }
            }
            continue;
        }

        let Some(tab) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Tab::ALL.get(i).copied())
        else {
            println!("Unknown tab '{}'.", choice);
            continue;
        };

        println!("\n{}", tab.subheader());
        if tab.uses_upload() && !upload.as_ref().is_some_and(|t| !t.is_empty()) {
            println!("No fund data loaded; choose 'u' to upload a CSV.");
        }
        let Some(request) = read_request(tab)? else {
            break;
        };

        println!("\n{}...", tab.action_label());
        let outcome = shell::run_tab(&agents, &request, upload.as_ref()).await;
        println!("\n{}\n", outcome);
    }

    Ok(())
}
