//! Backend client and the per-turn call service.
//!
//! [`ChatBackend`] wraps the two backend endpoints behind a reqwest
//! client. [`ChatCallService`] runs one spawned task per user turn and
//! reports the outcome back to the event loop over an unbounded channel,
//! tagged with the turn id so stale outcomes can be dropped.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{ChatRequest, ChatResponse, NewSessionResponse};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

const SESSION_FETCH_ATTEMPTS: u32 = 3;
const SESSION_FETCH_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct ChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl ChatBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET /new_session`: mint the opaque session identifier.
    pub async fn new_session(
        &self,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let response = self.client.get(self.endpoint("new_session")).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(format!(
                "session request failed with {}: {}",
                status,
                summarize_error_body(&body)
            )
            .into());
        }
        let payload: NewSessionResponse = response.json().await?;
        Ok(payload.session_id)
    }

    /// Bounded-retry wrapper around [`Self::new_session`] used at startup.
    /// The delay doubles after each failed attempt; after the last attempt
    /// the final error is returned and startup aborts.
    pub async fn new_session_with_retry(
        &self,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let mut delay = SESSION_FETCH_BASE_DELAY;
        let mut last_error = None;
        for attempt in 1..=SESSION_FETCH_ATTEMPTS {
            match self.new_session().await {
                Ok(session_id) => return Ok(session_id),
                Err(e) => {
                    debug!("session fetch attempt {attempt} failed: {e}");
                    last_error = Some(e);
                    if attempt < SESSION_FETCH_ATTEMPTS {
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| "session fetch failed".into()))
    }

    /// `POST /chat`: one user turn, one reply.
    pub async fn send_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(format!(
                "chat request failed with {}: {}",
                status,
                summarize_error_body(&body)
            )
            .into());
        }
        let payload: ChatResponse = response.json().await?;
        Ok(payload.response)
    }
}

/// Pull a one-line summary out of a backend error body. FastAPI-style
/// bodies carry `{"detail": ...}`; OpenAI-style bodies nest the message
/// under `error`. Anything unrecognized is truncated raw text.
fn summarize_error_body(body: &str) -> String {
    const MAX_RAW_LEN: usize = 200;

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        let summary = value
            .get("detail")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .or_else(|| {
                value
                    .pointer("/error/message")
                    .and_then(|v| v.as_str())
                    .map(str::to_owned)
            })
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(str::to_owned)
            });
        if let Some(summary) = summary {
            let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
            if !collapsed.is_empty() {
                return collapsed;
            }
        }
    }

    let mut raw: String = trimmed.chars().take(MAX_RAW_LEN).collect();
    if raw.len() < trimmed.len() {
        raw.push_str("...");
    }
    raw
}

/// Outcome of one backend call. `Failed` carries diagnostic detail for
/// tracing; the transcript shows a fixed error text regardless.
#[derive(Clone, Debug)]
pub enum CallOutcome {
    Reply(String),
    Failed(String),
}

pub struct CallParams {
    pub backend: ChatBackend,
    pub request: ChatRequest,
    pub turn_id: u64,
}

#[derive(Clone)]
pub struct ChatCallService {
    tx: mpsc::UnboundedSender<(CallOutcome, u64)>,
}

impl ChatCallService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(CallOutcome, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_call(&self, params: CallParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let CallParams {
                backend,
                request,
                turn_id,
            } = params;

            let outcome = match backend.send_chat(&request).await {
                Ok(reply) => CallOutcome::Reply(reply),
                Err(e) => {
                    debug!("chat call for turn {turn_id} failed: {e}");
                    CallOutcome::Failed(e.to_string())
                }
            };
            let _ = tx.send((outcome, turn_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, outcome: CallOutcome, turn_id: u64) {
        let _ = self.tx.send((outcome, turn_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_double_slashes() {
        let backend = ChatBackend::new("http://127.0.0.1:8000/");
        assert_eq!(backend.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            backend.endpoint("new_session"),
            "http://127.0.0.1:8000/new_session"
        );
        assert_eq!(backend.endpoint("/chat"), "http://127.0.0.1:8000/chat");
    }

    #[test]
    fn error_summary_prefers_detail_field() {
        let body = r#"{"detail": "Invalid session ID"}"#;
        assert_eq!(summarize_error_body(body), "Invalid session ID");
    }

    #[test]
    fn error_summary_reads_nested_error_messages() {
        let body = r#"{"error": {"message": "model  overloaded"}}"#;
        assert_eq!(summarize_error_body(body), "model overloaded");

        let body = r#"{"message": "too many requests"}"#;
        assert_eq!(summarize_error_body(body), "too many requests");
    }

    #[test]
    fn error_summary_falls_back_to_raw_text() {
        assert_eq!(summarize_error_body(""), "<empty>");
        assert_eq!(summarize_error_body("  \n "), "<empty>");
        assert_eq!(summarize_error_body("bad gateway"), "bad gateway");

        let long = "x".repeat(300);
        let summary = summarize_error_body(&long);
        assert!(summary.ends_with("..."));
        assert!(summary.len() < long.len());
    }

    #[test]
    fn call_service_tags_outcomes_with_turn_ids() {
        let (service, mut rx) = ChatCallService::new();

        service.send_for_test(CallOutcome::Reply("Hello there.".to_string()), 7);
        let (outcome, turn_id) = rx.try_recv().expect("expected outcome");
        assert_eq!(turn_id, 7);
        assert!(matches!(outcome, CallOutcome::Reply(text) if text == "Hello there."));

        service.send_for_test(CallOutcome::Failed("connection refused".to_string()), 8);
        let (outcome, turn_id) = rx.try_recv().expect("expected outcome");
        assert_eq!(turn_id, 8);
        assert!(matches!(outcome, CallOutcome::Failed(_)));

        assert!(rx.try_recv().is_err());
    }
}
