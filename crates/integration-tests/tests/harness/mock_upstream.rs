//! Mock image generation upstream for integration tests
//!
//! Records every request it receives and answers from a fixed script of
//! replies. A held mock parks each request until the test releases it.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Path the mock serves, matching the default endpoint's path
pub const GENERATIONS_PATH: &str = "/v1/images/generations/dalle-2";

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with `{data: [{url}]}`
    Image(String),
    /// The given status with a plain text body
    Status(StatusCode, String),
    /// 200 with an arbitrary JSON body
    Body(serde_json::Value),
}

/// A request as the mock saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

/// Mock upstream bound to a random local port
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    /// Replies in order; the last one repeats once the script runs out
    replies: Vec<Reply>,
    request_count: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
    /// Present on held mocks; each request consumes one permit before answering
    gate: Option<Semaphore>,
}

impl MockUpstream {
    /// Start a mock that always returns the given image URL
    pub async fn start_with_image(url: &str) -> anyhow::Result<Self> {
        Self::start_inner(vec![Reply::Image(url.to_owned())], false).await
    }

    /// Start a mock that always answers with `status`
    pub async fn start_with_status(status: StatusCode) -> anyhow::Result<Self> {
        let reason = status.canonical_reason().unwrap_or_default().to_owned();
        Self::start_inner(vec![Reply::Status(status, reason)], false).await
    }

    /// Start a mock that answers with each reply in turn
    pub async fn start_with_replies(replies: Vec<Reply>) -> anyhow::Result<Self> {
        Self::start_inner(replies, false).await
    }

    /// Start a mock that parks every request until [`MockUpstream::release`]
    pub async fn start_held(replies: Vec<Reply>) -> anyhow::Result<Self> {
        Self::start_inner(replies, true).await
    }

    async fn start_inner(replies: Vec<Reply>, held: bool) -> anyhow::Result<Self> {
        anyhow::ensure!(!replies.is_empty(), "mock upstream needs at least one reply");

        let state = Arc::new(MockState {
            replies,
            request_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: held.then(|| Semaphore::new(0)),
        });

        let app = Router::new()
            .route(GENERATIONS_PATH, routing::post(handle_generate))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Full endpoint URL to configure the controller with
    pub fn endpoint(&self) -> Url {
        Url::parse(&format!("http://{}{GENERATIONS_PATH}", self.addr)).expect("valid mock URL")
    }

    /// Let `n` parked requests answer
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.state.gate {
            gate.add_permits(n);
        }
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Wait until at least `n` requests have arrived
    pub async fn wait_for_requests(&self, n: usize) {
        while self.request_count() < n {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    let index = state.request_count.fetch_add(1, Ordering::SeqCst);

    if let Some(gate) = &state.gate
        && let Ok(permit) = gate.acquire().await
    {
        permit.forget();
    }

    let reply = &state.replies[index.min(state.replies.len() - 1)];

    match reply {
        Reply::Image(url) => Json(serde_json::json!({
            "created": 1_700_000_000,
            "data": [{ "url": url }],
        }))
        .into_response(),
        Reply::Status(status, text) => (*status, text.clone()).into_response(),
        Reply::Body(value) => Json(value.clone()).into_response(),
    }
}
