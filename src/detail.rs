use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::api_client::{Annotations, TermCore};
use crate::clipboard::ClipboardSink;
use crate::term::{Term, TermRef};

/// Delimiter between gene names when copying the gene list.
pub const GENE_COPY_DELIMITER: &str = "||";

/// How long the "copied" indicator stays lit on the copy-genes control.
pub const COPY_FLASH: Duration = Duration::from_millis(1200);

const NO_NAME: &str = "No name available";
const NO_ID: &str = "No ID available";
const NO_DEFINITION: &str = "No definition available";
const DEFINITION_FAILED: &str = "Definition not available";
const NO_SYNONYMS: &str = "No synonyms available";
const UNABLE_TO_LOAD: &str = "Unable to load";
const NO_IDENTIFIER: &str = "No identifier available";

/// A label-list overlay section (genes, diseases).
#[derive(Debug, Clone, PartialEq)]
pub enum TextSection {
    Loading,
    Items(Vec<String>),
    Placeholder(&'static str),
}

/// A related-terms overlay section (parents, children). Items carry enough
/// to open their own detail view or go straight to the selection.
#[derive(Debug, Clone, PartialEq)]
pub enum RelatedSection {
    Loading,
    Items(Vec<TermRef>),
    Placeholder(&'static str),
}

impl TextSection {
    /// Lines for rendering; an empty loaded list still shows something.
    pub fn display_lines(&self, empty_text: &'static str) -> Vec<String> {
        match self {
            TextSection::Loading => vec!["Loading...".to_string()],
            TextSection::Placeholder(text) => vec![(*text).to_string()],
            TextSection::Items(items) if items.is_empty() => vec![empty_text.to_string()],
            TextSection::Items(items) => items.clone(),
        }
    }
}

/// Everything the overlay shows for the currently viewed term.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub term: Term,
    definition: Option<String>,
    definition_loading: bool,
    pub genes: TextSection,
    pub diseases: TextSection,
    pub parents: RelatedSection,
    pub children: RelatedSection,
}

impl DetailState {
    pub fn display_name(&self) -> &str {
        if self.term.name.is_empty() {
            NO_NAME
        } else {
            &self.term.name
        }
    }

    pub fn display_id(&self) -> &str {
        if self.term.id.is_empty() {
            NO_ID
        } else {
            &self.term.id
        }
    }

    pub fn display_definition(&self) -> &str {
        if self.definition_loading {
            return "Loading...";
        }
        self.definition.as_deref().unwrap_or(NO_DEFINITION)
    }

    pub fn display_synonyms(&self) -> Vec<String> {
        if self.term.synonyms.is_empty() {
            vec![NO_SYNONYMS.to_string()]
        } else {
            self.term.synonyms.clone()
        }
    }
}

/// What to fetch for a freshly opened overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRequest {
    pub id: String,
    /// False when the term arrived with a definition already attached.
    pub need_core: bool,
}

/// Outcome of the core (definition/synonyms) fetch within a detail payload.
#[derive(Debug, Clone)]
pub enum CoreOutcome {
    /// Not requested; the term already carried its definition.
    Skipped,
    Fetched(TermCore),
    Failed,
}

/// Combined payload for one overlay open. `None` in a field means that
/// fetch failed and the section degrades to its placeholder.
#[derive(Debug, Clone)]
pub struct DetailData {
    pub core: CoreOutcome,
    pub annotations: Option<Annotations>,
    pub parents: Option<Vec<TermRef>>,
    pub children: Option<Vec<TermRef>>,
}

/// Owns the overlay state for a single term at a time. Fetch results are
/// applied only while the overlay still shows the term they were requested
/// for; anything else arrives late and is dropped.
#[derive(Default)]
pub struct DetailController {
    state: Option<DetailState>,
    copied_at: Option<Instant>,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the overlay for `term`. Returns the fetch to run, or `None`
    /// when the term has no id (sections degrade immediately, nothing is
    /// fetched).
    pub fn open(&mut self, term: Term) -> Option<DetailRequest> {
        self.copied_at = None;
        let has_id = !term.id.is_empty();
        let has_definition = term.definition.is_some();

        let state = DetailState {
            definition: term.definition.clone(),
            definition_loading: !has_definition && has_id,
            genes: if has_id {
                TextSection::Loading
            } else {
                TextSection::Placeholder(NO_IDENTIFIER)
            },
            diseases: if has_id {
                TextSection::Loading
            } else {
                TextSection::Placeholder(NO_IDENTIFIER)
            },
            parents: if has_id {
                RelatedSection::Loading
            } else {
                RelatedSection::Placeholder(NO_IDENTIFIER)
            },
            children: if has_id {
                RelatedSection::Loading
            } else {
                RelatedSection::Placeholder(NO_IDENTIFIER)
            },
            term,
        };
        let request = has_id.then(|| DetailRequest {
            id: state.term.id.clone(),
            need_core: !has_definition,
        });
        debug!(target: "detail", id = %state.term.id, fetch = request.is_some(), "overlay opened");
        self.state = Some(state);
        request
    }

    /// Apply a combined fetch payload. Guarded by term id so a response for
    /// a closed or superseded overlay never touches the current one.
    pub fn apply_fetch(&mut self, id: &str, data: DetailData) {
        let Some(state) = self.state.as_mut() else {
            debug!(target: "detail", id, "payload for closed overlay dropped");
            return;
        };
        if state.term.id != id {
            debug!(target: "detail", stale = id, current = %state.term.id, "stale payload dropped");
            return;
        }

        state.definition_loading = false;
        match data.core {
            CoreOutcome::Fetched(core) => {
                if state.definition.is_none() {
                    state.definition = core.definition.clone();
                    state.term.definition = core.definition;
                }
                if state.term.synonyms.is_empty() {
                    state.term.synonyms = core
                        .synonyms
                        .into_iter()
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
            }
            CoreOutcome::Failed => {
                if state.definition.is_none() {
                    state.definition = Some(DEFINITION_FAILED.to_string());
                }
            }
            CoreOutcome::Skipped => {}
        }

        match data.annotations {
            Some(annotations) => {
                state.term.genes = annotations.genes.clone();
                state.term.diseases = annotations.diseases.clone();
                state.genes = TextSection::Items(annotations.genes);
                state.diseases = TextSection::Items(annotations.diseases);
            }
            None => {
                state.genes = TextSection::Placeholder(UNABLE_TO_LOAD);
                state.diseases = TextSection::Placeholder(UNABLE_TO_LOAD);
            }
        }

        match data.parents {
            Some(parents) => {
                state.term.parents = parents.clone();
                state.parents = RelatedSection::Items(parents);
            }
            None => state.parents = RelatedSection::Placeholder(UNABLE_TO_LOAD),
        }
        match data.children {
            Some(children) => {
                state.term.children = children.clone();
                state.children = RelatedSection::Items(children);
            }
            None => state.children = RelatedSection::Placeholder(UNABLE_TO_LOAD),
        }
    }

    pub fn close(&mut self) {
        self.state = None;
        self.copied_at = None;
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&DetailState> {
        self.state.as_ref()
    }

    /// Id of the currently viewed term, when it has one.
    pub fn current_id(&self) -> Option<&str> {
        self.state
            .as_ref()
            .map(|s| s.term.id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// The currently viewed term, for "add current term to selection".
    pub fn current_term(&self) -> Option<Term> {
        self.state.as_ref().map(|s| s.term.clone())
    }

    /// Copy the rendered gene list to the clipboard, `||`-joined. Returns
    /// the number of genes copied; failures surface to the caller as a
    /// blocking notice.
    pub fn copy_genes(&mut self, clipboard: &mut dyn ClipboardSink) -> Result<usize> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| anyhow!("no term is open"))?;
        let genes = match &state.genes {
            TextSection::Items(genes) if !genes.is_empty() => genes,
            _ => return Err(anyhow!("no genes to copy")),
        };
        clipboard.set_text(&genes.join(GENE_COPY_DELIMITER))?;
        self.copied_at = Some(Instant::now());
        Ok(genes.len())
    }

    /// True while the copy-genes success indicator should be shown.
    pub fn copy_flash_active(&self) -> bool {
        self.copied_at
            .map(|at| at.elapsed() < COPY_FLASH)
            .unwrap_or(false)
    }
}
