use std::time::Duration;

use async_trait::async_trait;
use relaybot_settings::AiConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::provider::{ChatCompleter, ChatMessage, ProviderError};

/// Client for any endpoint speaking the OpenAI `chat/completions` protocol.
pub struct OpenAiCompatClient {
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(request_timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChatCompleter for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn complete(&self, config: &AiConfig, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        validate(config)?;

        let body = build_request_body(config, messages);
        let url = format!("{}/chat/completions", config.base_url);

        debug!(model = %config.model, messages = body.messages.len(), "sending completion request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status == 429 {
            let retry = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|s| s * 1000) // seconds to ms
                .unwrap_or(5000);
            return Err(ProviderError::RateLimited { retry_after_ms: retry });
        }

        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "completion API error");
            return Err(ProviderError::Api { status, message: text });
        }

        let api_resp: ApiResponse = resp.json().await.map_err(|e| ProviderError::Parse(e.to_string()))?;

        api_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ProviderError::EmptyResponse)
    }
}

fn validate(config: &AiConfig) -> Result<(), ProviderError> {
    if config.api_key.is_empty() {
        return Err(ProviderError::NotConfigured("AI API Key 未配置，请联系管理员".into()));
    }
    if config.base_url.is_empty() {
        return Err(ProviderError::NotConfigured("AI Base URL 未配置，请联系管理员".into()));
    }
    if config.model.is_empty() {
        return Err(ProviderError::NotConfigured("AI Model 未配置，请联系管理员".into()));
    }
    Ok(())
}

/// System prompt with the reply-length note appended when a token cap is set.
pub fn system_prompt(config: &AiConfig) -> String {
    if config.max_completion_tokens > 0 {
        format!(
            "{}\n\n请注意，每次回答不能超过{}个汉字。",
            config.prompt, config.max_completion_tokens
        )
    } else {
        config.prompt.clone()
    }
}

fn build_request_body(config: &AiConfig, messages: Vec<ChatMessage>) -> ApiRequest {
    let system = system_prompt(config);
    let mut all = Vec::with_capacity(messages.len() + 1);
    if !system.is_empty() {
        all.push(ChatMessage::system(system));
    }
    all.extend(messages);

    ApiRequest {
        model: config.model.clone(),
        messages: all,
        stream: false,
        max_completion_tokens: (config.max_completion_tokens > 0).then_some(config.max_completion_tokens),
    }
}

// Wire types (private)

#[derive(Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> AiConfig {
        AiConfig {
            base_url: base_url.to_string(),
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
            prompt: "你是一个群聊助手".into(),
            ..Default::default()
        }
    }

    fn client() -> OpenAiCompatClient {
        OpenAiCompatClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "stream": false,
                "messages": [
                    {"role": "system", "content": "你是一个群聊助手"},
                    {"role": "user", "content": "你好"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "你好！"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = config(&format!("{}/v1", server.uri()));
        let reply = client().complete(&cfg, vec![ChatMessage::user("你好")]).await.unwrap();
        assert_eq!(reply, "你好！");
    }

    #[tokio::test]
    async fn token_cap_is_sent_and_noted_in_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "max_completion_tokens": 100,
                "messages": [{
                    "role": "system",
                    "content": "你是一个群聊助手\n\n请注意，每次回答不能超过100个汉字。"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let mut cfg = config(&server.uri());
        cfg.max_completion_tokens = 100;
        assert_eq!(client().complete(&cfg, vec![ChatMessage::user("hi")]).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn empty_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client()
            .complete(&config(&server.uri()), vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "3"))
            .mount(&server)
            .await;

        let err = client()
            .complete(&config(&server.uri()), vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { retry_after_ms: 3000 }));
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client()
            .complete(&config(&server.uri()), vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
        assert_eq!(err.user_message(), "AI服务调用失败，请稍后再试");
    }

    #[tokio::test]
    async fn missing_settings_fail_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut cfg = config(&server.uri());
        cfg.api_key.clear();
        let err = client().complete(&cfg, vec![]).await.unwrap_err();
        assert_eq!(err.user_message(), "AI API Key 未配置，请联系管理员");

        let mut cfg = config(&server.uri());
        cfg.base_url.clear();
        let err = client().complete(&cfg, vec![]).await.unwrap_err();
        assert_eq!(err.user_message(), "AI Base URL 未配置，请联系管理员");

        let mut cfg = config(&server.uri());
        cfg.model.clear();
        let err = client().complete(&cfg, vec![]).await.unwrap_err();
        assert_eq!(err.user_message(), "AI Model 未配置，请联系管理员");
    }

    #[test]
    fn system_prompt_without_cap_is_unchanged() {
        assert_eq!(system_prompt(&config("http://x")), "你是一个群聊助手");
    }
}
