//! OpenAI-compatible chat-completion client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use blogdraft_shared::{DraftError, OpenAiConfig, Result};

use crate::{ChatModel, ChatRequest};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("blogdraft/", env!("CARGO_PKG_VERSION"));

/// Path appended to the base URL.
const COMPLETIONS_PATH: &str = "chat/completions";

/// How much of an unparseable error body is echoed back in the error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Settings for building an [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientOptions {
    /// Combine the `[openai]` config section with a resolved API key.
    pub fn from_config(config: &OpenAiConfig, api_key: String) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Build a client. Fails on an unparseable base URL; makes no network calls.
    pub fn new(opts: ClientOptions) -> Result<Self> {
        let endpoint = completions_url(&opts.base_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| DraftError::remote(format!("failed to build HTTP client: {e}")))?;

        debug!(%endpoint, timeout_secs = opts.timeout_secs, "chat client ready");

        Ok(Self {
            client,
            endpoint,
            api_key: opts.api_key,
        })
    }

    /// The full `/chat/completions` URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    #[instrument(skip_all, fields(model = %request.model))]
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = CompletionRequest {
            model: &request.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        debug!(
            system_len = request.system.len(),
            user_len = request.user.len(),
            "sending chat completion request"
        );
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DraftError::remote(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DraftError::remote(format!(
                "HTTP {status}: {}",
                error_detail(&text)
            )));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| DraftError::remote(format!("invalid completion response: {e}")))?;

        let (tokens_in, tokens_out) = parsed
            .usage
            .as_ref()
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DraftError::remote("completion response contained no message content"))?;

        debug!(
            len = content.len(),
            tokens_in,
            tokens_out,
            latency_ms = start.elapsed().as_millis() as u64,
            "chat completion received"
        );

        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve `<base_url>/chat/completions`, tolerating a trailing slash on the base.
fn completions_url(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)
        .map_err(|e| DraftError::validation(format!("invalid base URL '{base_url}': {e}")))?;

    if base.cannot_be_a_base() {
        return Err(DraftError::validation(format!(
            "invalid base URL '{base_url}': cannot be a base"
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(COMPLETIONS_PATH)
        .map_err(|e| DraftError::validation(format!("invalid base URL '{base_url}': {e}")))
}

/// Pull the provider's error message out of a failed response body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(ClientOptions {
            base_url: server.uri(),
            api_key: "test-key".into(),
            timeout_secs: 5,
        })
        .expect("build client")
    }

    fn request() -> ChatRequest {
        ChatRequest::new("gpt-4", "You are an outliner.", "Outline fibers.")
    }

    #[test]
    fn completions_url_variants() {
        assert_eq!(
            completions_url("https://api.openai.com/v1").unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.openai.com/v1/").unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:8080").unwrap().as_str(),
            "http://localhost:8080/chat/completions"
        );
    }

    #[test]
    fn completions_url_rejects_garbage() {
        let err = completions_url("not a url").unwrap_err();
        assert!(matches!(err, DraftError::Validation { .. }));
    }

    #[test]
    fn error_detail_prefers_provider_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_detail(body), "Incorrect API key provided");
        assert_eq!(error_detail("upstream timeout"), "upstream timeout");
    }

    #[test]
    fn request_serializes_roles_in_order() {
        let req = request();
        let body = CompletionRequest {
            model: &req.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &req.system,
                },
                WireMessage {
                    role: "user",
                    content: &req.user,
                },
            ],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"model":"gpt-4","messages":[{"role":"system","content":"You are an outliner."},{"role":"user","content":"Outline fibers."}]}"#
        );
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4",
                "messages": [
                    {"role": "system", "content": "You are an outliner."},
                    {"role": "user", "content": "Outline fibers."}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "# Intro\n# Conclusion"}}
                ],
                "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).complete(&request()).await.unwrap();
        assert_eq!(text, "# Intro\n# Conclusion");
    }

    #[tokio::test]
    async fn complete_maps_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        match err {
            DraftError::RemoteService(msg) => {
                assert!(msg.contains("401"), "got: {msg}");
                assert!(msg.contains("Incorrect API key"), "got: {msg}");
            }
            other => panic!("expected RemoteService, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_rejects_empty_choices() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, DraftError::RemoteService(_)));
    }

    #[tokio::test]
    async fn complete_rejects_null_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, DraftError::RemoteService(_)));
    }

    #[tokio::test]
    async fn complete_rejects_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("invalid completion response"));
    }

    #[tokio::test]
    async fn complete_unreachable_service() {
        let server = MockServer::start().await;
        let base_url = server.uri();
        drop(server);

        let client = OpenAiClient::new(ClientOptions {
            base_url,
            api_key: "test-key".into(),
            timeout_secs: 5,
        })
        .unwrap();

        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, DraftError::RemoteService(_)));
    }
}
