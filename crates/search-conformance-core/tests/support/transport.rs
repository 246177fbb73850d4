// crates/search-conformance-core/tests/support/transport.rs
// ============================================================================
// Module: Scripted Transport
// Description: In-memory search transport with per-query scripted replies.
// ============================================================================
//! ## Overview
//! Replays scripted steps per query text. The final step of a script repeats
//! for every later call.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers may panic on poisoned locks."
)]

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use search_conformance_core::Query;
use search_conformance_core::ResultPage;
use search_conformance_core::ResultRecord;
use search_conformance_core::SearchResponse;
use search_conformance_core::SearchTransport;
use search_conformance_core::TransportError;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Step {
    /// Reply with a response.
    Respond(SearchResponse),
    /// Fail with a transport error.
    Fail(TransportError),
    /// Wait before performing the inner step.
    Delay(Duration, Box<Step>),
    /// Never reply.
    Hang,
}

/// Transport replaying scripted steps keyed by query text.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    /// Remaining steps per query text.
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    /// Total number of calls.
    calls: AtomicUsize,
}

impl ScriptedTransport {
    /// Registers the steps for a query text.
    pub fn script(self, text: &str, steps: Vec<Step>) -> Self {
        self.scripts.lock().unwrap().insert(text.to_string(), steps.into());
        self
    }

    /// Returns the number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Takes the next step for a query text.
    fn next_step(&self, text: &str) -> Step {
        let mut scripts = self.scripts.lock().unwrap();
        let Some(queue) = scripts.get_mut(text) else {
            return Step::Fail(TransportError::Request(format!("no script for {text}")));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl SearchTransport for ScriptedTransport {
    async fn search(&self, query: &Query) -> Result<SearchResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut step = self.next_step(query.text());
        loop {
            match step {
                Step::Respond(response) => return Ok(response),
                Step::Fail(err) => return Err(err),
                Step::Delay(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    step = *inner;
                }
                Step::Hang => return std::future::pending().await,
            }
        }
    }
}

/// Builds a 200 response carrying the records.
pub fn page(records: Vec<ResultRecord>) -> Step {
    let found = u64::try_from(records.len()).unwrap();
    Step::Respond(SearchResponse {
        status: 200,
        body: "{}".to_string(),
        page: Some(ResultPage {
            found,
            records,
        }),
    })
}

/// Builds a response with a status and no page.
pub fn status(code: u16) -> Step {
    Step::Respond(SearchResponse {
        status: code,
        body: String::new(),
        page: None,
    })
}
