/// LLM Client: the single point of entry for all generative-text API calls.
///
/// ARCHITECTURAL RULE: No other module may call the API directly.
/// The pipeline talks to the `TailoringClient` trait; `LlmClient` is the
/// HTTP implementation. One attempt per prompt: no retry loop lives here.
use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmConfig;

pub mod prompts;
pub mod reply;

pub use reply::{parse_reply, StructuredReply};

// ────────────────────────────────────────────────────────────────────────────
// Tasks and prompts
// ────────────────────────────────────────────────────────────────────────────

/// One of the four sub-generations performed per pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TailoringTask {
    AboutMe,
    ExperienceSelection,
    /// Scoped to a single selected experience.
    DutyHighlighting { experience_id: u32 },
    SkillsTailoring,
}

impl fmt::Display for TailoringTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TailoringTask::AboutMe => write!(f, "about-me summary"),
            TailoringTask::ExperienceSelection => write!(f, "experience selection"),
            TailoringTask::DutyHighlighting { experience_id } => {
                write!(f, "duty highlighting (experience {experience_id})")
            }
            TailoringTask::SkillsTailoring => write!(f, "skills tailoring"),
        }
    }
}

/// A fully built request for one task. Produced by the prompt builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub task: TailoringTask,
    pub system: &'static str,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailoringErrorKind {
    Unauthorized,
    RateLimited,
    Timeout,
    /// The reply did not have the task's expected shape.
    MalformedReply,
    ServiceUnavailable,
}

impl TailoringErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            TailoringErrorKind::Unauthorized => "UNAUTHORIZED",
            TailoringErrorKind::RateLimited => "RATE_LIMITED",
            TailoringErrorKind::Timeout => "TIMEOUT",
            TailoringErrorKind::MalformedReply => "MALFORMED_REPLY",
            TailoringErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Transport-level failures. A malformed reply is the prompt's fault and
    /// is never a retry candidate.
    pub fn is_transport(self) -> bool {
        !matches!(self, TailoringErrorKind::MalformedReply)
    }
}

impl fmt::Display for TailoringErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{kind} during {}: {message}", task_label(.task))]
pub struct TailoringError {
    pub kind: TailoringErrorKind,
    pub task: Option<TailoringTask>,
    pub message: String,
}

impl TailoringError {
    pub fn new(
        kind: TailoringErrorKind,
        task: Option<TailoringTask>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            task,
            message: message.into(),
        }
    }

    pub fn malformed(task: TailoringTask, message: impl Into<String>) -> Self {
        Self::new(TailoringErrorKind::MalformedReply, Some(task), message)
    }
}

fn task_label(task: &Option<TailoringTask>) -> String {
    task.map(|t| t.to_string())
        .unwrap_or_else(|| "API call".to_string())
}

/// Maps a non-success HTTP status to the error taxonomy.
pub fn classify_status(status: StatusCode) -> TailoringErrorKind {
    match status.as_u16() {
        401 | 403 => TailoringErrorKind::Unauthorized,
        429 => TailoringErrorKind::RateLimited,
        408 | 504 => TailoringErrorKind::Timeout,
        _ => TailoringErrorKind::ServiceUnavailable,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client trait
// ────────────────────────────────────────────────────────────────────────────

/// Executes one prompt and returns the parsed, typed reply.
/// Implement this to swap the backend without touching the pipeline.
#[async_trait]
pub trait TailoringClient: Send + Sync {
    async fn execute(&self, prompt: &Prompt) -> Result<StructuredReply, TailoringError>;
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.base_url),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the prompt once and returns the raw reply text.
    pub async fn complete(&self, prompt: &Prompt) -> Result<String, TailoringError> {
        let task = Some(prompt.task);
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_completion_tokens: prompt.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| transport_error(e, task))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("API returned {status} for {}: {message}", prompt.task);
            return Err(TailoringError::new(
                classify_status(status),
                task,
                format!("status {}: {message}", status.as_u16()),
            ));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TailoringError::new(TailoringErrorKind::Timeout, task, e.to_string())
            } else {
                TailoringError::new(
                    TailoringErrorKind::MalformedReply,
                    task,
                    format!("unexpected response body: {e}"),
                )
            }
        })?;

        if let Some(usage) = &chat.usage {
            debug!(
                "{} succeeded: prompt_tokens={}, completion_tokens={}",
                prompt.task, usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text().map(str::to_string).ok_or_else(|| {
            TailoringError::new(
                TailoringErrorKind::MalformedReply,
                task,
                "reply contained no text",
            )
        })
    }
}

#[async_trait]
impl TailoringClient for LlmClient {
    async fn execute(&self, prompt: &Prompt) -> Result<StructuredReply, TailoringError> {
        let text = self.complete(prompt).await?;
        parse_reply(prompt.task, &text)
    }
}

fn transport_error(e: reqwest::Error, task: Option<TailoringTask>) -> TailoringError {
    let kind = if e.is_timeout() {
        TailoringErrorKind::Timeout
    } else {
        TailoringErrorKind::ServiceUnavailable
    };
    TailoringError::new(kind, task, e.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    // ── local HTTP stub ──────────────────────────────────────────────────────

    /// Accepts one connection, sends back the head of the request it read,
    /// waits `delay`, then answers with `response`.
    fn serve_once(response: String, delay: Duration) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let _ = tx.send(request);
            std::thread::sleep(delay);
            let _ = stream.write_all(response.as_bytes());
        });
        (format!("http://{addr}/v1"), rx)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        line.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn client_for(base_url: String, timeout: Duration) -> LlmClient {
        LlmClient::new(&LlmConfig {
            api_key: "test-key".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url,
            timeout,
        })
        .unwrap()
    }

    fn about_me_prompt() -> Prompt {
        Prompt {
            task: TailoringTask::AboutMe,
            system: "You write summaries.",
            user: "Summarize me".to_string(),
            temperature: 0.7,
            max_tokens: 300,
        }
    }

    const OK_BODY: &str =
        r#"{"choices":[{"message":{"content":"Seasoned engineer."}}],"usage":{"prompt_tokens":5,"completion_tokens":3}}"#;

    #[tokio::test]
    async fn test_execute_sends_one_request_and_parses_reply() {
        let (url, requests) = serve_once(http_response("200 OK", OK_BODY), Duration::ZERO);
        let client = client_for(url, Duration::from_secs(5));

        let reply = client.execute(&about_me_prompt()).await.unwrap();

        assert_eq!(reply, StructuredReply::Summary("Seasoned engineer.".to_string()));
        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer test-key"));
        assert!(request.contains(r#""max_completion_tokens":300"#));
        assert!(request.contains(r#""role":"system""#));
    }

    #[tokio::test]
    async fn test_error_status_carries_api_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided"}}"#;
        let (url, _requests) =
            serve_once(http_response("401 Unauthorized", body), Duration::ZERO);
        let client = client_for(url, Duration::from_secs(5));

        let err = client.complete(&about_me_prompt()).await.unwrap_err();

        assert_eq!(err.kind, TailoringErrorKind::Unauthorized);
        assert_eq!(err.task, Some(TailoringTask::AboutMe));
        assert!(err.message.contains("Incorrect API key provided"), "{}", err.message);
    }

    #[tokio::test]
    async fn test_rate_limit_status() {
        let (url, _requests) =
            serve_once(http_response("429 Too Many Requests", "slow down"), Duration::ZERO);
        let client = client_for(url, Duration::from_secs(5));

        let err = client.complete(&about_me_prompt()).await.unwrap_err();

        assert_eq!(err.kind, TailoringErrorKind::RateLimited);
        assert!(err.message.contains("slow down"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let (url, _requests) =
            serve_once(http_response("200 OK", "<html>gateway</html>"), Duration::ZERO);
        let client = client_for(url, Duration::from_secs(5));

        let err = client.complete(&about_me_prompt()).await.unwrap_err();

        assert_eq!(err.kind, TailoringErrorKind::MalformedReply);
    }

    #[tokio::test]
    async fn test_empty_content_is_malformed() {
        let body = r#"{"choices":[{"message":{"content":""}}]}"#;
        let (url, _requests) = serve_once(http_response("200 OK", body), Duration::ZERO);
        let client = client_for(url, Duration::from_secs(5));

        let err = client.complete(&about_me_prompt()).await.unwrap_err();

        assert_eq!(err.kind, TailoringErrorKind::MalformedReply);
    }

    #[tokio::test]
    async fn test_slow_server_is_timeout() {
        let (url, _requests) =
            serve_once(http_response("200 OK", OK_BODY), Duration::from_secs(3));
        let client = client_for(url, Duration::from_millis(200));

        let err = client.complete(&about_me_prompt()).await.unwrap_err();

        assert_eq!(err.kind, TailoringErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_refused_connection_is_service_unavailable() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = client_for(format!("http://{addr}/v1"), Duration::from_secs(5));

        let err = client.complete(&about_me_prompt()).await.unwrap_err();

        assert_eq!(err.kind, TailoringErrorKind::ServiceUnavailable);
    }

    // ── pure helpers ─────────────────────────────────────────────────────────

    #[test]
    fn test_status_classification() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            TailoringErrorKind::Unauthorized
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN),
            TailoringErrorKind::Unauthorized
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            TailoringErrorKind::RateLimited
        );
        assert_eq!(
            classify_status(StatusCode::GATEWAY_TIMEOUT),
            TailoringErrorKind::Timeout
        );
        assert_eq!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE),
            TailoringErrorKind::ServiceUnavailable
        );
        assert_eq!(
            classify_status(StatusCode::BAD_REQUEST),
            TailoringErrorKind::ServiceUnavailable
        );
    }

    #[test]
    fn test_only_malformed_reply_is_not_transport() {
        assert!(!TailoringErrorKind::MalformedReply.is_transport());
        for kind in [
            TailoringErrorKind::Unauthorized,
            TailoringErrorKind::RateLimited,
            TailoringErrorKind::Timeout,
            TailoringErrorKind::ServiceUnavailable,
        ] {
            assert!(kind.is_transport(), "{kind} should be transport-level");
        }
    }

    #[test]
    fn test_chat_response_text() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Hello"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }"#;
        let chat: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(chat.text(), Some("Hello"));
    }

    #[test]
    fn test_chat_response_without_content_has_no_text() {
        let chat: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "  "}}]}"#).unwrap();
        assert_eq!(chat.text(), None);

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_error_display_names_task() {
        let err = TailoringError::malformed(
            TailoringTask::DutyHighlighting { experience_id: 7 },
            "no bullet lines",
        );
        let shown = err.to_string();
        assert!(shown.contains("MALFORMED_REPLY"));
        assert!(shown.contains("experience 7"));
    }
}
