//! REST client for the Gemini `generateContent` endpoint.
//!
//! Sends a single-turn text prompt and returns the concatenated text of
//! the first candidate, using [`reqwest`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default public API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for scene generation.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for [`GeminiApi`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as the `key` query parameter. Calls fail fast when `None`.
    pub api_key: Option<String>,
    /// Model identifier, e.g. `gemini-1.5-flash-latest`.
    pub model: String,
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Whole-request timeout; expiry surfaces as [`GeminiError::Request`].
    pub request_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// No API key was configured.
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response carried no candidate text.
    #[error("Gemini returned no text ({reason})")]
    EmptyResponse {
        /// Block or finish reason reported by the API, if any.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Subset of the `generateContent` response this client reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    ///
    /// Returns [`GeminiError::EmptyResponse`] when there is no candidate or
    /// its parts contain no text, carrying the block or finish reason.
    pub fn into_text(self) -> Result<String, GeminiError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(GeminiError::EmptyResponse {
                reason: block_reason.unwrap_or_else(|| "no candidates".to_string()),
            });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyResponse {
                reason: candidate
                    .finish_reason
                    .unwrap_or_else(|| "empty content".to_string()),
            });
        }
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Gemini API.
pub struct GeminiApi {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiApi {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Full `generateContent` URL for the configured model (without key).
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send `prompt` as a single user turn and return the generated text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, GeminiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GeminiError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed = response.json::<GenerateContentResponse>().await?;
        parsed.into_text()
    }

    /// Return the response unchanged on success, or an
    /// [`GeminiError::ApiError`] with the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GeminiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use assert_matches::assert_matches;
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{Method, StatusCode, Uri};
    use axum::Router;

    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn concatenates_first_candidate_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"a = 1\n"},{"text":"self.wait()"}],"role":"model"},"finishReason":"STOP"},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        );
        assert_eq!(response.into_text().unwrap(), "a = 1\nself.wait()");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let response = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert_matches!(
            response.into_text(),
            Err(GeminiError::EmptyResponse { reason }) if reason == "SAFETY"
        );
    }

    #[test]
    fn empty_parts_report_finish_reason() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[]},"finishReason":"MAX_TOKENS"}]}"#);
        assert_matches!(
            response.into_text(),
            Err(GeminiError::EmptyResponse { reason }) if reason == "MAX_TOKENS"
        );
    }

    #[test]
    fn endpoint_uses_model_and_trims_slash() {
        let api = GeminiApi::new(GeminiConfig {
            api_key: None,
            model: "gemini-test".into(),
            base_url: "http://localhost:9999/".into(),
            ..GeminiConfig::default()
        });
        assert_eq!(
            api.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    // -----------------------------------------------------------------------
    // HTTP round trips against a local stub server
    // -----------------------------------------------------------------------

    /// `(method + path, query, JSON body)` of each request the stub saw.
    type Seen = Arc<Mutex<Vec<(String, Option<String>, serde_json::Value)>>>;

    #[derive(Clone)]
    struct Stub {
        status: StatusCode,
        reply: &'static str,
        delay: Duration,
        seen: Seen,
    }

    async fn record(
        State(stub): State<Stub>,
        method: Method,
        uri: Uri,
        body: Bytes,
    ) -> (StatusCode, &'static str) {
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        stub.seen.lock().unwrap().push((
            format!("{method} {}", uri.path()),
            uri.query().map(str::to_string),
            json,
        ));
        tokio::time::sleep(stub.delay).await;
        (stub.status, stub.reply)
    }

    /// Serve `reply` with `status` on an ephemeral port and return a client
    /// pointed at it.
    async fn stub_api(
        status: StatusCode,
        reply: &'static str,
        delay: Duration,
        timeout: Duration,
    ) -> (GeminiApi, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new().fallback(record).with_state(Stub {
            status,
            reply,
            delay,
            seen: seen.clone(),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = GeminiApi::new(GeminiConfig {
            api_key: Some("test-key".into()),
            model: "gemini-test".into(),
            base_url: format!("http://{addr}"),
            request_timeout: timeout,
        });
        (api, seen)
    }

    #[tokio::test]
    async fn sends_prompt_as_single_user_turn() {
        let (api, seen) = stub_api(
            StatusCode::OK,
            r#"{"candidates":[{"content":{"parts":[{"text":"circle = Circle()\n"},{"text":"self.play(Create(circle))"}]}}]}"#,
            Duration::ZERO,
            Duration::from_secs(5),
        )
        .await;

        let text = api.generate_content("draw a circle").await.unwrap();
        assert_eq!(text, "circle = Circle()\nself.play(Create(circle))");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (request_line, query, body) = &seen[0];
        assert_eq!(request_line, "POST /v1beta/models/gemini-test:generateContent");
        assert_eq!(query.as_deref(), Some("key=test-key"));
        assert_eq!(
            body,
            &serde_json::json!({ "contents": [{ "parts": [{ "text": "draw a circle" }] }] })
        );
    }

    #[tokio::test]
    async fn error_status_becomes_api_error() {
        let (api, _seen) = stub_api(
            StatusCode::INTERNAL_SERVER_ERROR,
            "quota exceeded",
            Duration::ZERO,
            Duration::from_secs(5),
        )
        .await;

        assert_matches!(
            api.generate_content("draw a circle").await,
            Err(GeminiError::ApiError { status: 500, body }) if body == "quota exceeded"
        );
    }

    #[tokio::test]
    async fn stalled_call_times_out() {
        let (api, _seen) = stub_api(
            StatusCode::OK,
            "{}",
            Duration::from_secs(5),
            Duration::from_millis(200),
        )
        .await;

        assert_matches!(
            api.generate_content("draw a circle").await,
            Err(GeminiError::Request(e)) if e.is_timeout()
        );
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let api = GeminiApi::new(GeminiConfig::default());
        assert_matches!(
            api.generate_content("hello").await,
            Err(GeminiError::MissingApiKey)
        );
    }
}
