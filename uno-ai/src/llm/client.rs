//! 对话补全 API 客户端
//!
//! 向远端的 OpenAI 兼容接口发送一次提示并取回第一条回复。单次请求，不重试。

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// 默认模型
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// 建立连接超时（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 错误信息中保留的响应体长度
const BODY_PREVIEW_CHARS: usize = 200;

/// 客户端配置，进程启动时构造一次
#[derive(Clone)]
pub struct ChatConfig {
    /// 补全接口完整地址
    pub api_url: String,
    /// Bearer 凭证
    pub api_key: String,
    /// 模型标识
    pub model: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl ChatConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// 补全调用失败
///
/// 调用方不区分具体原因，一律按"调用失败"处理。
#[derive(Error, Debug)]
pub enum CompletionError {
    /// 网络错误、超时或读取响应体失败
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 非 2xx 状态码
    #[error("Completion API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// 响应体不是预期的 JSON
    #[error("Malformed completion response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// 没有 choices 或 content 为空
    #[error("Completion response has no message content")]
    EmptyChoices,
}

/// 补全接口抽象，便于在测试中替换远端服务
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 发送提示，返回第一条回复的文本
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn preview(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// 基于 reqwest 的补全客户端
pub struct ChatClient {
    config: ChatConfig,
    client: reqwest::Client,
}

impl ChatClient {
    /// 创建新的客户端
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl CompletionClient for ChatClient {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(
            "Sending completion request: model={}, prompt_len={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: preview(&body, BODY_PREVIEW_CHARS),
            });
        }

        debug!("Raw completion response: {}", preview(&body, 500));

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyChoices)?;

        info!("Completion received: {} chars", content.len());

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn client_for(url: String) -> ChatClient {
        let mut config = ChatConfig::new(url, "secret-key");
        config.model = "test-model".to_string();
        config.timeout_secs = 5;
        ChatClient::new(config).unwrap()
    }

    /// 把收到的请求原样编码进回复内容
    async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let content = json!({ "auth": auth, "request": body }).to_string();
        Json(json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }))
    }

    #[test]
    fn test_default_config() {
        let config = ChatConfig::new("http://localhost/v1", "k");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.has_api_key());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ChatConfig::new("http://localhost/v1", "super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_request_shape_and_bearer() {
        let url = spawn_stub(Router::new().route("/v1/chat/completions", post(echo))).await;
        let client = client_for(url);

        let content = client.complete("pick a card").await.unwrap();
        let echoed: Value = serde_json::from_str(&content).unwrap();

        assert_eq!(echoed["auth"], "Bearer secret-key");
        assert_eq!(
            echoed["request"],
            json!({
                "model": "test-model",
                "messages": [{ "role": "user", "content": "pick a card" }]
            })
        );
    }

    #[tokio::test]
    async fn test_first_choice_wins() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(json!({ "choices": [
                    { "message": { "content": "first" } },
                    { "message": { "content": "second" } }
                ] }))
            }),
        );
        let client = client_for(spawn_stub(router).await);
        assert_eq!(client.complete("x").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let client = client_for(spawn_stub(router).await);

        match client.complete("x").await {
            Err(CompletionError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let router = Router::new().route("/v1/chat/completions", post(|| async { "not json" }));
        let client = client_for(spawn_stub(router).await);

        assert!(matches!(
            client.complete("x").await,
            Err(CompletionError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_choices() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let client = client_for(spawn_stub(router).await);
        assert!(matches!(client.complete("x").await, Err(CompletionError::EmptyChoices)));

        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [{ "message": { "content": null } }] })) }),
        );
        let client = client_for(spawn_stub(router).await);
        assert!(matches!(client.complete("x").await, Err(CompletionError::EmptyChoices)));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "choices": [{ "message": { "content": "too late" } }] }))
            }),
        );
        let mut config = ChatConfig::new(spawn_stub(router).await, "secret-key");
        config.timeout_secs = 1;
        let client = ChatClient::new(config).unwrap();

        match client.complete("x").await {
            Err(CompletionError::Transport(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}/v1/chat/completions", addr));
        assert!(matches!(
            client.complete("x").await,
            Err(CompletionError::Transport(_))
        ));
    }
}
