use tracing::debug;

use crate::api_client::NetworkError;
use crate::debouncer::Debouncer;
use crate::term::Term;

/// What the results area should show. The controller owns this; the UI only
/// reads it.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    /// Empty query, nothing to show.
    Idle,
    /// Keystrokes seen, debounce window running.
    Pending,
    /// A request for `query` is in flight.
    Loading { query: String },
    /// Successful response with at least one match.
    Results { query: String },
    /// Successful response with no matches.
    NoResults { query: String },
    /// Transport or parse failure.
    Failed { query: String, message: String },
}

/// Drives the query input through debounce, dispatch, and result
/// application. Network I/O happens elsewhere; `poll_ready_query` hands out
/// the query to fetch and `apply_result` takes the response back, dropping
/// anything that no longer matches the live query (last-writer-wins by
/// query string).
pub struct SearchController {
    phase: SearchPhase,
    query: String,
    terms: Vec<Term>,
    debouncer: Debouncer,
}

impl SearchController {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            phase: SearchPhase::Idle,
            query: String::new(),
            terms: Vec::new(),
            debouncer: Debouncer::new(debounce_ms),
        }
    }

    /// Feed the raw input line. A whitespace-only query drops straight to
    /// `Idle` and invalidates any in-flight request; anything else restarts
    /// the debounce window.
    pub fn on_input_changed(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.query.clear();
            self.terms.clear();
            self.debouncer.cancel();
            self.phase = SearchPhase::Idle;
            return;
        }
        self.query = trimmed.to_string();
        self.debouncer.restart();
        self.phase = SearchPhase::Pending;
    }

    /// Poll from the event loop tick. When the debounce window elapses this
    /// returns the query to fetch, exactly once, and moves to `Loading`.
    pub fn poll_ready_query(&mut self) -> Option<String> {
        if !self.debouncer.fires() {
            return None;
        }
        if self.query.is_empty() {
            return None;
        }
        debug!(target: "search", query = %self.query, "dispatching search");
        self.phase = SearchPhase::Loading {
            query: self.query.clone(),
        };
        Some(self.query.clone())
    }

    /// Apply a search response. Responses for anything other than the
    /// current query are stale and ignored. Returns true when the response
    /// was accepted, so the caller knows whether the result list changed.
    pub fn apply_result(&mut self, query: &str, result: Result<Vec<Term>, NetworkError>) -> bool {
        if query != self.query {
            debug!(target: "search", stale = query, current = %self.query, "dropping stale response");
            return false;
        }
        match result {
            Ok(terms) if terms.is_empty() => {
                self.terms.clear();
                self.phase = SearchPhase::NoResults {
                    query: query.to_string(),
                };
            }
            Ok(terms) => {
                self.terms = terms;
                self.phase = SearchPhase::Results {
                    query: query.to_string(),
                };
            }
            Err(e) => {
                self.terms.clear();
                self.phase = SearchPhase::Failed {
                    query: query.to_string(),
                    message: e.to_string(),
                };
            }
        }
        true
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    /// Results in the order the service returned them. Empty outside the
    /// `Results` phase.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn result_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
