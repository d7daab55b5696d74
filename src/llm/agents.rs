use log::info;

use crate::error::Result;
use crate::ingestion::FundTable;
use crate::llm::client::{ChatBackend, CompletionClient};
use crate::llm::prompts;
use crate::schema::DocumentType;

/// The five fund-operations agents over one shared completion client.
///
/// Agents hold no state between calls and do not validate their inputs;
/// the shell checks for empty fields before calling them.
pub struct FundAgents<B> {
    client: CompletionClient<B>,
}

impl<B: ChatBackend> FundAgents<B> {
    pub fn new(client: CompletionClient<B>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CompletionClient<B> {
        &self.client
    }

    /// Drafts a legal document of the chosen type from free-text context.
    pub async fn legal_ops(&self, context: &str, doc_type: DocumentType) -> Result<String> {
        info!("Legal Ops: drafting {}", doc_type);
        let prompt = prompts::legal_ops_prompt(context, doc_type);
        self.client.complete(&prompt).await
    }

    /// Summarizes cash positions and capital calls from uploaded capital data.
    pub async fn cfo_ops(&self, capital_data: &FundTable) -> Result<String> {
        info!(
            "CFO Ops: summarizing treasury from {} rows",
            capital_data.len()
        );
        let prompt = prompts::cfo_ops_prompt(capital_data);
        self.client.complete(&prompt).await
    }

    /// Answers an LP question in the voice of investor relations.
    pub async fn investor_comms(&self, question: &str, context: &str) -> Result<String> {
        info!("Investor Comms: drafting LP response");
        let prompt = prompts::investor_comms_prompt(question, context);
        self.client.complete(&prompt).await
    }

    pub async fn esg_intel(&self, context: &str) -> Result<String> {
        info!("ESG Intelligence: analyzing ESG performance");
        let prompt = prompts::esg_intel_prompt(context);
        self.client.complete(&prompt).await
    }

    pub async fn risk_strategy(&self, performance_data: &FundTable) -> Result<String> {
        info!(
            "Risk Strategy: analyzing exposures from {} rows",
            performance_data.len()
        );
        let prompt = prompts::risk_strategy_prompt(performance_data);
        self.client.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Echo {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatBackend for Echo {
        async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
            let prompt = request.messages[1].content.clone();
            self.prompts.lock().unwrap().push(prompt.clone());
            Ok(ChatCompletionResponse {
                choices: vec![ChatChoice {
                    index: 0,
                    message: ChoiceMessage {
                        role: Some(Role::Assistant),
                        content: Some(format!("  echo: {}  ", prompt)),
                    },
                    finish_reason: None,
                }],
                usage: None,
            })
        }
    }

    fn agents() -> FundAgents<Echo> {
        FundAgents::new(CompletionClient::new(Echo::default()))
    }

    #[tokio::test]
    async fn test_each_agent_sends_its_own_prompt() {
        let agents = agents();
        let table = FundTable::new(
            vec!["LP".into(), "Called".into()],
            vec![vec!["Acme".into(), "6M".into()]],
        )
        .unwrap();

        agents.legal_ops("ctx", DocumentType::Lpa).await.unwrap();
        agents.cfo_ops(&table).await.unwrap();
        agents.investor_comms("q?", "ctx").await.unwrap();
        agents.esg_intel("ctx").await.unwrap();
        agents.risk_strategy(&table).await.unwrap();

        let sent = agents.client().backend().prompts.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![
                prompts::legal_ops_prompt("ctx", DocumentType::Lpa),
                prompts::cfo_ops_prompt(&table),
                prompts::investor_comms_prompt("q?", "ctx"),
                prompts::esg_intel_prompt("ctx"),
                prompts::risk_strategy_prompt(&table),
            ]
        );
    }

    #[tokio::test]
    async fn test_agent_returns_client_result_unchanged() {
        let result = agents().esg_intel("Net zero").await.unwrap();
        assert_eq!(
            result,
            format!("echo: {}", prompts::esg_intel_prompt("Net zero"))
        );
    }
}
