// system-tests/tests/helpers/search_stub.rs
// ============================================================================
// Module: Search Service Stub
// Description: Minimal vacancy search service for system-tests.
// Purpose: Serve canned result pages so suites run end to end over HTTP.
// Dependencies: axum, tokio
// ============================================================================

//! The stub answers `GET /vacancies?text=...` with the fixture registered for
//! the exact query text, or an empty page. It can reject long queries with
//! 414 and fail the first requests with 503.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::thread;

use axum::Router;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Path served by the stub.
pub const SEARCH_PATH: &str = "/vacancies";
/// Body served when no fixture matches.
const EMPTY_PAGE: &str = r#"{"found":0,"items":[]}"#;

/// Shared handler state.
struct StubState {
    /// Query text to response body.
    fixtures: BTreeMap<String, String>,
    /// Longest accepted query, in characters.
    max_query_chars: Option<usize>,
    /// Remaining requests to fail with 503.
    fail_remaining: AtomicUsize,
    /// Query texts received, in arrival order.
    requests: Arc<Mutex<Vec<String>>>,
}

/// Builder for a stub search service.
#[derive(Debug, Clone, Default)]
pub struct SearchStub {
    /// Query text to response body.
    fixtures: BTreeMap<String, String>,
    /// Longest accepted query, in characters.
    max_query_chars: Option<usize>,
    /// Requests to fail with 503 before serving fixtures.
    fail_first: usize,
}

impl SearchStub {
    /// Creates a stub serving the given fixtures.
    pub const fn new(fixtures: BTreeMap<String, String>) -> Self {
        Self {
            fixtures,
            max_query_chars: None,
            fail_first: 0,
        }
    }

    /// Rejects queries longer than `chars` with 414.
    pub const fn max_query_chars(mut self, chars: usize) -> Self {
        self.max_query_chars = Some(chars);
        self
    }

    /// Fails the first `count` requests with 503.
    pub const fn fail_first(mut self, count: usize) -> Self {
        self.fail_first = count;
        self
    }

    /// Binds a loopback port and serves on a background thread.
    pub fn spawn(self) -> Result<SearchStubHandle, String> {
        let listener = StdTcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("search stub bind failed: {err}"))?;
        listener
            .set_nonblocking(true)
            .map_err(|err| format!("search stub listener nonblocking failed: {err}"))?;
        let addr =
            listener.local_addr().map_err(|err| format!("search stub local addr failed: {err}"))?;
        let endpoint = format!("http://{addr}{SEARCH_PATH}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(StubState {
            fixtures: self.fixtures,
            max_query_chars: self.max_query_chars,
            fail_remaining: AtomicUsize::new(self.fail_first),
            requests: Arc::clone(&requests),
        });
        let app = Router::new().route(SEARCH_PATH, get(handle_search)).with_state(state);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = thread::spawn(move || {
            let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
                return;
            };
            runtime.block_on(async move {
                let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                    return;
                };
                let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                let _ = server.await;
            });
        });
        Ok(SearchStubHandle {
            endpoint,
            shutdown: Some(shutdown_tx),
            join: Some(join),
            requests,
        })
    }
}

/// Handle for a running stub; shuts the server down on drop.
pub struct SearchStubHandle {
    /// Search endpoint URL.
    endpoint: String,
    /// Shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
    /// Server thread.
    join: Option<thread::JoinHandle<()>>,
    /// Received query texts.
    requests: Arc<Mutex<Vec<String>>>,
}

impl SearchStubHandle {
    /// Returns the search endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the query texts received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl Drop for SearchStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Serves one search request.
async fn handle_search(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let text = params.get("text").cloned().unwrap_or_default();
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(text.clone());
    }
    if state
        .fail_remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| remaining.checked_sub(1))
        .is_ok()
    {
        return (StatusCode::SERVICE_UNAVAILABLE, "temporarily unavailable").into_response();
    }
    if state.max_query_chars.is_some_and(|limit| text.chars().count() > limit) {
        return (StatusCode::URI_TOO_LONG, "Request-URI Too Large").into_response();
    }
    let body = state.fixtures.get(&text).map_or_else(|| EMPTY_PAGE.to_string(), Clone::clone);
    (StatusCode::OK, [(CONTENT_TYPE, "application/json")], body).into_response()
}
