use crate::config::DEFAULT_MODEL;
use crate::error::{ImperiumError, Result};
use crate::llm::prompts::SYSTEM_INSTRUCTION;
use crate::llm::types::*;
use async_trait::async_trait;
use log::debug;

#[cfg(feature = "groq")]
use crate::config::ImperiumConfig;
#[cfg(feature = "groq")]
use reqwest::{Client, StatusCode};

/// Transport for one chat-completion round trip.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse>;
}

#[async_trait]
impl<B: ChatBackend + ?Sized> ChatBackend for std::sync::Arc<B> {
    async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        (**self).chat(request).await
    }
}

/// HTTP transport for Groq's OpenAI-compatible endpoint.
#[cfg(feature = "groq")]
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[cfg(feature = "groq")]
impl GroqClient {
    pub fn from_config(config: &ImperiumConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

#[cfg(feature = "groq")]
#[async_trait]
impl ChatBackend for GroqClient {
    async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let api_key = self.api_key.as_deref().ok_or(ImperiumError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            "POST {} (model={}, messages={})",
            url,
            request.model,
            request.messages.len()
        );

        let res = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = res.status();
        debug!("Completion service answered with status {}", status);

        if !status.is_success() {
            let err_text = res.text().await?;
            let message = serde_json::from_str::<ApiErrorBody>(&err_text)
                .map(|body| body.error.message)
                .unwrap_or(err_text);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ImperiumError::Authentication {
                    status: status.as_u16(),
                    message,
                },
                StatusCode::TOO_MANY_REQUESTS => ImperiumError::RateLimited { message },
                _ => ImperiumError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// One request per call: the fixed persona plus the caller's prompt, first
/// choice back, trimmed.
#[derive(Clone)]
pub struct CompletionClient<B> {
    backend: B,
    model: String,
}

#[cfg(feature = "groq")]
impl CompletionClient<GroqClient> {
    pub fn from_config(config: &ImperiumConfig) -> Self {
        Self::new(GroqClient::from_config(config)).with_model(config.model.clone())
    }
}

impl<B: ChatBackend> CompletionClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn complete(&self, prompt: &str) -> Result<String> {
        self.complete_with_model(prompt, &self.model).await
    }

    pub async fn complete_with_model(&self, prompt: &str, model: &str) -> Result<String> {
        debug!(
            "Requesting completion from {} ({} prompt chars)",
            model,
            prompt.len()
        );

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(prompt),
            ],
        };

        let response = self.backend.chat(&request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ImperiumError::EmptyResponse("No choices returned".to_string())
        })?;

        let content = choice.message.content.ok_or_else(|| {
            ImperiumError::EmptyResponse("Choice carried no message content".to_string())
        })?;

        Ok(content.trim().to_string())
    }

    /// Same call as [`complete`](Self::complete), with failures folded into
    /// the returned text as `"Error: <details>"`.
    pub async fn complete_text(&self, prompt: &str) -> String {
        match self.complete(prompt).await {
            Ok(text) => text,
            Err(e) => e.display_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Scripted {
        reply: Mutex<Option<Result<ChatCompletionResponse>>>,
        seen: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl Scripted {
        fn new(reply: Result<ChatCompletionResponse>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for Scripted {
        async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("backend called more than once")
        }
    }

    fn reply(content: Option<&str>) -> ChatCompletionResponse {
        ChatCompletionResponse {
            choices: vec![ChatChoice {
                index: 0,
                message: ChoiceMessage {
                    role: Some(Role::Assistant),
                    content: content.map(str::to_string),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        }
    }

    #[tokio::test]
    async fn test_sends_system_then_user() {
        let client = CompletionClient::new(Scripted::new(Ok(reply(Some("ok")))));
        client.complete("Draft an NDA").await.unwrap();

        let seen = client.backend().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, DEFAULT_MODEL);
        assert_eq!(
            seen[0].messages,
            vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user("Draft an NDA"),
            ]
        );
    }

    #[tokio::test]
    async fn test_trims_content() {
        let client = CompletionClient::new(Scripted::new(Ok(reply(Some("\n  Dear LP,\n\n")))));
        assert_eq!(client.complete("q").await.unwrap(), "Dear LP,");
    }

    #[tokio::test]
    async fn test_model_override() {
        let client =
            CompletionClient::new(Scripted::new(Ok(reply(Some("ok"))))).with_model("llama3-70b-8192");
        client.complete("q").await.unwrap();
        assert_eq!(client.backend().seen.lock().unwrap()[0].model, "llama3-70b-8192");
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let empty = ChatCompletionResponse {
            choices: vec![],
            usage: None,
        };
        let client = CompletionClient::new(Scripted::new(Ok(empty)));
        let text = client.complete_text("q").await;
        assert_eq!(text, "Error: Empty completion response: No choices returned");
    }

    #[tokio::test]
    async fn test_null_content_is_an_error() {
        let client = CompletionClient::new(Scripted::new(Ok(reply(None))));
        let err = client.complete("q").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_backend_errors_become_text() {
        let client = CompletionClient::new(Scripted::new(Err(ImperiumError::Authentication {
            status: 401,
            message: "Invalid API Key".to_string(),
        })));
        let text = client.complete_text("q").await;
        assert!(text.starts_with("Error: "));
        assert!(text.contains("Invalid API Key"));
    }
}
