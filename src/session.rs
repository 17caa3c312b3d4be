//! Search/commentary session controller
//!
//! The controller is the only writer of [`SessionState`]. Readers hold a
//! [`SessionHandle`] and either take snapshots or wait for changes.
//!
//! Search and commentary each run `Idle -> Loading -> Done` independently.
//! A new request may be issued while one is in flight; every request gets a
//! generation number and a reply is only applied if no newer request of the
//! same kind has started since.

use crate::client::{HadithService, SearchRequest};
use crate::commentary::{commentary_request, CommentaryFailure, CommentaryResult};
use crate::error::{ServiceFailure, TakhrijError};
use crate::parser::{self, HadithRecord, SearchResponse};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Leading narrative shown when the search call failed
pub const CONNECTIVITY_ERROR: &str = "Error connecting to server.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Done,
}

pub type SearchOutcome = Result<SearchResponse, ServiceFailure>;
pub type CommentaryOutcome = Result<CommentaryResult, CommentaryFailure>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub query: String,
    pub search_status: RequestStatus,
    pub last_response: Option<SearchOutcome>,
    pub commentary_status: RequestStatus,
    pub last_commentary: Option<CommentaryOutcome>,
    /// Whether the commentary view is showing
    pub commentary_open: bool,
    #[serde(skip)]
    search_generation: u64,
    #[serde(skip)]
    commentary_generation: u64,
}

impl SessionState {
    /// Latest search as displayed; failures become the connectivity message
    pub fn rendered_response(&self) -> Option<SearchResponse> {
        self.last_response.as_ref().map(|outcome| match outcome {
            Ok(response) => response.clone(),
            Err(_) => SearchResponse::narrative(CONNECTIVITY_ERROR),
        })
    }

    /// Latest commentary as displayed; failures become the error placeholder
    pub fn rendered_commentary(&self) -> Option<CommentaryResult> {
        self.last_commentary.as_ref().map(|outcome| match outcome {
            Ok(result) => result.clone(),
            Err(failure) => failure.render(),
        })
    }

    pub fn records(&self) -> &[HadithRecord] {
        match &self.last_response {
            Some(Ok(response)) => &response.records,
            _ => &[],
        }
    }

    pub fn has_results(&self) -> bool {
        self.search_status != RequestStatus::Loading && !self.records().is_empty()
    }

    pub fn no_results(&self) -> bool {
        self.search_status != RequestStatus::Loading
            && self
                .rendered_response()
                .map(|r| r.is_no_result())
                .unwrap_or(false)
    }

    pub fn search_failure(&self) -> Option<&ServiceFailure> {
        match &self.last_response {
            Some(Err(reason)) => Some(reason),
            _ => None,
        }
    }

    /// Synthesized records have no source to comment on
    pub fn can_request_commentary(record: &HadithRecord) -> bool {
        !record.is_ai_generated()
    }
}

/// Read-only view of a session for the presentation layer
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub fn snapshot(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change. Errors once the controller is gone.
    pub async fn changed(&mut self) -> Result<SessionState, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// Owns the session state and drives the remote calls
#[derive(Clone)]
pub struct SessionController {
    service: Arc<dyn HadithService>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionController {
    pub fn new(service: Arc<dyn HadithService>) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self {
            service,
            state: Arc::new(tx),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            rx: self.state.subscribe(),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.query = text);
    }

    pub fn clear_query(&self) {
        self.state.send_modify(|s| s.query.clear());
    }

    pub fn dismiss_commentary(&self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.commentary_open, false));
    }

    /// Search for `query` and store the parsed result. Blank queries are ignored.
    pub async fn submit_search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let generation = self.begin_search(query);
        info!(generation, query, "Searching");

        let request = SearchRequest {
            query: query.to_string(),
        };
        let outcome = match self.service.search(&request).await {
            Ok(reply) => {
                let response = parser::parse(&reply.result);
                info!(generation, records = response.records.len(), "Search settled");
                Ok(response)
            }
            Err(reason) => {
                warn!(generation, error = %reason, "Search failed");
                Err(reason)
            }
        };

        self.finish_search(generation, outcome);
    }

    /// Run [`submit_search`](Self::submit_search) on the runtime
    pub fn spawn_search(&self, query: impl Into<String>) -> JoinHandle<()> {
        let this = self.clone();
        let query = query.into();
        tokio::spawn(async move { this.submit_search(&query).await })
    }

    /// Fetch commentary for `record` and store it for display.
    ///
    /// Records whose reference is `AI Generated` are rejected without
    /// touching the session.
    pub async fn request_commentary(&self, record: &HadithRecord) -> Result<(), TakhrijError> {
        ensure_commentable(record)?;
        self.run_commentary(record.clone()).await;
        Ok(())
    }

    /// Run [`request_commentary`](Self::request_commentary) on the runtime
    pub fn spawn_commentary(&self, record: HadithRecord) -> Result<JoinHandle<()>, TakhrijError> {
        ensure_commentable(&record)?;
        let this = self.clone();
        Ok(tokio::spawn(async move { this.run_commentary(record).await }))
    }

    /// Back to a fresh session. Replies still in flight are discarded.
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            let search_generation = s.search_generation + 1;
            let commentary_generation = s.commentary_generation + 1;
            *s = SessionState {
                search_generation,
                commentary_generation,
                ..SessionState::default()
            };
        });
        debug!("Session reset");
    }

    fn begin_search(&self, query: &str) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.search_generation += 1;
            generation = s.search_generation;
            s.query = query.to_string();
            s.search_status = RequestStatus::Loading;
            s.last_response = None;
            s.commentary_open = false;
        });
        generation
    }

    fn finish_search(&self, generation: u64, outcome: SearchOutcome) {
        self.state.send_if_modified(|s| {
            if s.search_generation != generation {
                debug!(generation, current = s.search_generation, "Discarding stale search reply");
                return false;
            }
            s.last_response = Some(outcome);
            s.search_status = RequestStatus::Done;
            true
        });
    }

    async fn run_commentary(&self, record: HadithRecord) {
        let request = commentary_request(&record);

        let mut generation = 0;
        self.state.send_modify(|s| {
            s.commentary_generation += 1;
            generation = s.commentary_generation;
            s.commentary_status = RequestStatus::Loading;
        });
        info!(generation, reference = %record.reference, collection = %request.collection, "Requesting commentary");

        let outcome = match self.service.commentary(&request).await {
            Ok(reply) => {
                info!(generation, "Commentary settled");
                Ok(CommentaryResult::from_reply(reply, &record))
            }
            Err(reason) => {
                warn!(generation, error = %reason, "Commentary failed");
                Err(CommentaryFailure { reason, record })
            }
        };

        self.state.send_if_modified(|s| {
            if s.commentary_generation != generation {
                debug!(generation, current = s.commentary_generation, "Discarding stale commentary reply");
                return false;
            }
            s.last_commentary = Some(outcome);
            s.commentary_status = RequestStatus::Done;
            s.commentary_open = true;
            true
        });
    }
}

fn ensure_commentable(record: &HadithRecord) -> Result<(), TakhrijError> {
    if SessionState::can_request_commentary(record) {
        Ok(())
    } else {
        Err(TakhrijError::CommentaryUnavailable(
            "AI generated records have no source to comment on".to_string(),
        ))
    }
}
