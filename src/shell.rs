//! Tab model for the front end: what each tab asks for, how missing input is
//! reported, and how an agent result is turned into display text.
//!
//! Validation happens here, before any agent runs, so a tab with a missing
//! field never reaches the completion service.

use crate::error::{ImperiumError, Result};
use crate::ingestion::FundTable;
use crate::llm::agents::FundAgents;
use crate::llm::client::ChatBackend;
use crate::schema::DocumentType;
use log::{info, warn};
use std::fmt;

pub const APP_TITLE: &str = "🏛 Imperium AI";
pub const APP_TAGLINE: &str = "Enterprise AI system for managing legal, ops, LPs, ESG and fund strategy across global asset firms.";
pub const UPLOAD_SUCCESS: &str = "Data uploaded successfully.";

pub const MISSING_LEGAL_CONTEXT: &str = "Please enter context.";
pub const MISSING_CAPITAL_DATA: &str = "Upload fund data.";
pub const MISSING_LP_INPUT: &str = "Provide context and question.";
pub const MISSING_ESG_CONTEXT: &str = "Please enter ESG context.";
pub const MISSING_RETURN_DATA: &str = "Upload fund return data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    LegalOps,
    CfoOps,
    InvestorComms,
    EsgIntelligence,
    RiskStrategy,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::LegalOps,
        Tab::CfoOps,
        Tab::InvestorComms,
        Tab::EsgIntelligence,
        Tab::RiskStrategy,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::LegalOps => "📄 Legal Ops",
            Tab::CfoOps => "💰 CFO Ops",
            Tab::InvestorComms => "💬 Investor Comms",
            Tab::EsgIntelligence => "🌿 ESG Intelligence",
            Tab::RiskStrategy => "📊 Risk Strategy",
        }
    }

    pub fn subheader(&self) -> &'static str {
        match self {
            Tab::LegalOps => "📄 Legal Automation",
            Tab::CfoOps => "💰 Treasury & CFO Dashboard",
            Tab::InvestorComms => "💬 LP Communications",
            Tab::EsgIntelligence => "🌿 ESG Intel",
            Tab::RiskStrategy => "📊 Risk & Strategy Analysis",
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            Tab::LegalOps => "Generate Legal Doc",
            Tab::CfoOps => "Run CFO Ops",
            Tab::InvestorComms => "Generate Response",
            Tab::EsgIntelligence => "Run ESG Analysis",
            Tab::RiskStrategy => "Analyze Risk",
        }
    }

    pub fn result_label(&self) -> &'static str {
        match self {
            Tab::LegalOps => "Legal Draft",
            Tab::CfoOps => "CFO Summary",
            Tab::InvestorComms => "LP Response",
            Tab::EsgIntelligence => "ESG Report",
            Tab::RiskStrategy => "Risk Report",
        }
    }

    /// Tabs that read the uploaded table instead of form text.
    pub fn uses_upload(&self) -> bool {
        matches!(self, Tab::CfoOps | Tab::RiskStrategy)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Form contents submitted from one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRequest {
    LegalOps {
        context: String,
        doc_type: DocumentType,
    },
    CfoOps,
    InvestorComms {
        context: String,
        question: String,
    },
    EsgIntelligence {
        context: String,
    },
    RiskStrategy,
}

impl TabRequest {
    pub fn tab(&self) -> Tab {
        match self {
            TabRequest::LegalOps { .. } => Tab::LegalOps,
            TabRequest::CfoOps => Tab::CfoOps,
            TabRequest::InvestorComms { .. } => Tab::InvestorComms,
            TabRequest::EsgIntelligence { .. } => Tab::EsgIntelligence,
            TabRequest::RiskStrategy => Tab::RiskStrategy,
        }
    }

    /// Checks required fields. An empty table counts as no upload.
    pub fn validate(&self, upload: Option<&FundTable>) -> Result<()> {
        let has_table = upload.is_some_and(|t| !t.is_empty());
        let missing = match self {
            TabRequest::LegalOps { context, .. } if blank(context) => Some(MISSING_LEGAL_CONTEXT),
            TabRequest::CfoOps if !has_table => Some(MISSING_CAPITAL_DATA),
            TabRequest::InvestorComms { context, question } if blank(context) || blank(question) => {
                Some(MISSING_LP_INPUT)
            }
            TabRequest::EsgIntelligence { context } if blank(context) => Some(MISSING_ESG_CONTEXT),
            TabRequest::RiskStrategy if !has_table => Some(MISSING_RETURN_DATA),
            _ => None,
        };

        match missing {
            Some(message) => Err(ImperiumError::MissingInput(message.to_string())),
            None => Ok(()),
        }
    }
}

/// What a tab shows after its action button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabOutcome {
    /// A required field was missing; nothing was sent.
    Invalid(String),
    /// The agent ran. `text` is the completion or an `"Error: ..."` line.
    Completed { label: &'static str, text: String },
}

impl fmt::Display for TabOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabOutcome::Invalid(message) => write!(f, "⚠ {}", message),
            TabOutcome::Completed { label, text } => write!(f, "{}\n\n{}", label, text),
        }
    }
}

/// Validates the request, runs the matching agent and renders the result.
pub async fn run_tab<B: ChatBackend>(
    agents: &FundAgents<B>,
    request: &TabRequest,
    upload: Option<&FundTable>,
) -> TabOutcome {
    let tab = request.tab();

    if let Err(e) = request.validate(upload) {
        warn!("{}: {}", tab.title(), e);
        return match e {
            ImperiumError::MissingInput(message) => TabOutcome::Invalid(message),
            other => TabOutcome::Invalid(other.to_string()),
        };
    }

    info!("{}: {}", tab.title(), tab.action_label());
    let text = match dispatch(agents, request, upload).await {
        Ok(text) => text,
        Err(e) => {
            warn!("{} failed: {}", tab.title(), e);
            e.display_text()
        }
    };

    TabOutcome::Completed {
        label: tab.result_label(),
        text,
    }
}

async fn dispatch<B: ChatBackend>(
    agents: &FundAgents<B>,
    request: &TabRequest,
    upload: Option<&FundTable>,
) -> Result<String> {
    let table = || {
        upload.ok_or_else(|| ImperiumError::MissingInput(request.tab().title().to_string()))
    };

    match request {
        TabRequest::LegalOps { context, doc_type } => agents.legal_ops(context, *doc_type).await,
        TabRequest::CfoOps => agents.cfo_ops(table()?).await,
        TabRequest::InvestorComms { context, question } => {
            agents.investor_comms(question, context).await
        }
        TabRequest::EsgIntelligence { context } => agents.esg_intel(context).await,
        TabRequest::RiskStrategy => agents.risk_strategy(table()?).await,
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}
