use crate::config::ChatConfig;
use crate::models::ChatTurn;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ERROR_BODY_LIMIT: usize = 400;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream returned an empty reply")]
    EmptyReply,
}

/// Anything that can turn an assembled message list into one assistant reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_check_in(&self, messages: &[ChatTurn]) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completion client (DeepSeek by default).
pub struct HttpChatBackend {
    http: Client,
    config: ChatConfig,
}

impl HttpChatBackend {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_check_in(&self, messages: &[ChatTurn]) -> Result<String, ChatError> {
        let api_key = self.config.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body: CompletionResponse = response.json().await?;
        first_reply(body)
    }
}

fn first_reply(body: CompletionResponse) -> Result<String, ChatError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ChatError::EmptyReply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> CompletionResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn first_choice_content_is_the_reply() {
        let body = parse(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Nice walk!" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }));
        assert_eq!(first_reply(body).unwrap(), "Nice walk!");
    }

    #[test]
    fn missing_or_blank_content_is_an_error() {
        for body in [
            json!({ "choices": [] }),
            json!({}),
            json!({ "choices": [{ "message": { "content": null } }] }),
            json!({ "choices": [{ "message": { "content": "  \n" } }] }),
        ] {
            assert!(matches!(first_reply(parse(body)), Err(ChatError::EmptyReply)));
        }
    }

    #[test]
    fn request_body_matches_completion_api() {
        let messages = vec![ChatTurn::system("be kind"), ChatTurn::user("hi")];
        let request = CompletionRequest {
            model: "deepseek-chat",
            messages: &messages,
            temperature: 0.5,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "deepseek-chat");
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let backend = HttpChatBackend::new(ChatConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".into(),
            ..ChatConfig::default()
        })
        .unwrap();
        let err = backend.send_check_in(&[ChatTurn::user("hi")]).await.unwrap_err();
        assert!(matches!(err, ChatError::MissingApiKey));
    }
}
