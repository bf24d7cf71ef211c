use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::term::{synonyms_from_value, Term, TermRef};

/// Default cap on rows requested from the search endpoint per call.
pub const MAX_SEARCH_RESULTS: usize = 500;

/// The only error kind the remote services produce from our point of view:
/// the transport failed, the service answered with a non-success status, or
/// the body did not have the shape we expect.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("malformed response from {url}: {detail}")]
    Malformed { url: String, detail: String },
}

/// Canonical definition and synonyms for a term, from the term detail
/// endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermCore {
    pub definition: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Gene and disease associations for a term.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    pub genes: Vec<String>,
    /// Already formatted as `"name (id)"` for display.
    pub diseases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnnotationsResponse {
    #[serde(default)]
    genes: Vec<GeneEntry>,
    #[serde(default)]
    diseases: Vec<DiseaseEntry>,
}

#[derive(Debug, Deserialize)]
struct GeneEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct DiseaseEntry {
    name: String,
    id: String,
}

/// Direction of an ontology neighborhood fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Parents,
    Children,
}

impl Relation {
    fn path_segment(self) -> &'static str {
        match self {
            Relation::Parents => "parents",
            Relation::Children => "children",
        }
    }
}

/// Thin client over the two read-only HPO services: the free-text search
/// endpoint and the per-term detail/annotation/neighbor endpoints.
#[derive(Clone)]
pub struct HpoApiClient {
    search_url: String,
    term_url: String,
    max_results: usize,
    client: reqwest::blocking::Client,
}

impl HpoApiClient {
    pub fn new(search_url: &str, term_url: &str, max_results: usize) -> Self {
        Self {
            search_url: search_url.trim_end_matches('/').to_string(),
            term_url: term_url.trim_end_matches('/').to_string(),
            max_results,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Query the search endpoint. Result order is the service's relevance
    /// order and is preserved as-is. An empty row list is a valid "no
    /// matches" outcome, not an error.
    pub fn search(&self, query: &str) -> Result<Vec<Term>, NetworkError> {
        let url = self.search_url.clone();
        let max = self.max_results.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("max", max.as_str())])
            .send()
            .map_err(|source| NetworkError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status { url, status });
        }

        let body: Value = response.json().map_err(|e| NetworkError::Malformed {
            url: url.clone(),
            detail: e.to_string(),
        })?;

        let terms = parse_search_payload(&body).ok_or_else(|| NetworkError::Malformed {
            url: url.clone(),
            detail: "expected row list at position 3".to_string(),
        })?;

        debug!(target: "api", query, count = terms.len(), "search returned");
        Ok(terms)
    }

    /// Fetch the canonical definition and synonym list for a term. A
    /// non-success status degrades to empty values; only transport and
    /// parse failures surface as errors.
    pub fn fetch_term_core(&self, id: &str) -> Result<TermCore, NetworkError> {
        let url = format!("{}/{}", self.term_url, id);
        match self.get_degrading::<TermCore>(&url)? {
            Some(core) => Ok(core),
            None => Ok(TermCore::default()),
        }
    }

    /// Fetch gene and disease associations for a term, with the same
    /// degrade-on-status policy as `fetch_term_core`.
    pub fn fetch_annotations(&self, id: &str) -> Result<Annotations, NetworkError> {
        let url = format!("{}/{}/annotations", self.term_url, id);
        let raw = match self.get_degrading::<AnnotationsResponse>(&url)? {
            Some(raw) => raw,
            None => return Ok(Annotations::default()),
        };
        Ok(Annotations {
            genes: raw.genes.into_iter().map(|g| g.name).collect(),
            diseases: raw
                .diseases
                .into_iter()
                .map(|d| format!("{} ({})", d.name, d.id))
                .collect(),
        })
    }

    /// Fetch the immediate ontology neighbors of a term in one direction.
    pub fn fetch_related(&self, id: &str, relation: Relation) -> Result<Vec<TermRef>, NetworkError> {
        let url = format!("{}/{}/{}", self.term_url, id, relation.path_segment());
        Ok(self
            .get_degrading::<Vec<TermRef>>(&url)?
            .unwrap_or_default())
    }

    /// GET a typed body. `Ok(None)` means the service answered with a
    /// non-success status, which callers treat as "unavailable".
    fn get_degrading<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, NetworkError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| NetworkError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(target: "api", url, %status, "degrading non-success response");
            return Ok(None);
        }

        response
            .json::<T>()
            .map(Some)
            .map_err(|e| NetworkError::Malformed {
                url: url.to_string(),
                detail: e.to_string(),
            })
    }
}

/// The search endpoint answers with a positional JSON array whose fourth
/// element is the row list; each row is `[id, name, definition?, synonyms?]`.
/// Rows missing an id or name are dropped. Returns `None` when the payload
/// does not have that overall shape.
pub fn parse_search_payload(body: &Value) -> Option<Vec<Term>> {
    let rows = body.as_array()?.get(3)?.as_array()?;
    let terms = rows
        .iter()
        .filter_map(|row| {
            let row = row.as_array()?;
            let id = row.first()?.as_str()?.trim();
            let name = row.get(1)?.as_str()?.trim();
            if id.is_empty() || name.is_empty() {
                return None;
            }
            let mut term = Term::new(id, name);
            term.definition = row
                .get(2)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string);
            if let Some(raw) = row.get(3) {
                term.synonyms = synonyms_from_value(raw);
            }
            Some(term)
        })
        .collect();
    Some(terms)
}
