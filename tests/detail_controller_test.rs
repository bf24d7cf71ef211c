use anyhow::Result;
use hpo_cli::api_client::{Annotations, TermCore};
use hpo_cli::clipboard::ClipboardSink;
use hpo_cli::detail::{
    CoreOutcome, DetailController, DetailData, RelatedSection, TextSection, GENE_COPY_DELIMITER,
};
use hpo_cli::term::{Term, TermRef};

/// In-memory clipboard recording the last copied text.
#[derive(Default)]
struct MemoryClipboard {
    last: Option<String>,
    fail: bool,
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("clipboard unavailable");
        }
        self.last = Some(text.to_string());
        Ok(())
    }
}

fn full_payload() -> DetailData {
    DetailData {
        core: CoreOutcome::Fetched(TermCore {
            definition: Some("A sudden surge of electrical activity in the brain.".to_string()),
            synonyms: vec!["Fit".to_string(), "Convulsion".to_string()],
        }),
        annotations: Some(Annotations {
            genes: vec!["SCN1A".to_string(), "KCNQ2".to_string()],
            diseases: vec!["Dravet syndrome (OMIM:607208)".to_string()],
        }),
        parents: Some(vec![TermRef::new("HP:0012638", "Abnormal nervous system physiology")]),
        children: Some(vec![TermRef::new("HP:0002069", "Bilateral tonic-clonic seizure")]),
    }
}

fn failed_payload() -> DetailData {
    DetailData {
        core: CoreOutcome::Failed,
        annotations: None,
        parents: None,
        children: None,
    }
}

#[test]
fn opening_without_id_shows_placeholders_and_requests_nothing() {
    let mut detail = DetailController::new();
    let request = detail.open(Term::new("", "Mystery term"));
    assert!(request.is_none());

    let state = detail.state().unwrap();
    assert_eq!(state.display_name(), "Mystery term");
    assert_eq!(state.display_id(), "No ID available");
    assert_eq!(
        state.genes,
        TextSection::Placeholder("No identifier available")
    );
    assert_eq!(
        state.diseases,
        TextSection::Placeholder("No identifier available")
    );
}

#[test]
fn opening_with_id_requests_a_fetch_and_shows_loading() {
    let mut detail = DetailController::new();
    let request = detail.open(Term::new("HP:0001250", "Seizure")).unwrap();
    assert_eq!(request.id, "HP:0001250");
    assert!(request.need_core);

    let state = detail.state().unwrap();
    assert_eq!(state.genes, TextSection::Loading);
    assert_eq!(state.parents, RelatedSection::Loading);
    assert_eq!(state.display_definition(), "Loading...");
}

#[test]
fn a_term_with_a_definition_skips_the_core_fetch() {
    let mut detail = DetailController::new();
    let mut term = Term::new("HP:0001250", "Seizure");
    term.definition = Some("Already known.".to_string());
    let request = detail.open(term).unwrap();
    assert!(!request.need_core);
    assert_eq!(detail.state().unwrap().display_definition(), "Already known.");
}

#[test]
fn payload_populates_every_section_together() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    detail.apply_fetch("HP:0001250", full_payload());

    let state = detail.state().unwrap();
    assert_eq!(
        state.display_definition(),
        "A sudden surge of electrical activity in the brain."
    );
    assert_eq!(state.display_synonyms(), vec!["Fit", "Convulsion"]);
    assert_eq!(
        state.genes,
        TextSection::Items(vec!["SCN1A".to_string(), "KCNQ2".to_string()])
    );
    assert_eq!(
        state.diseases,
        TextSection::Items(vec!["Dravet syndrome (OMIM:607208)".to_string()])
    );
    assert!(matches!(&state.parents, RelatedSection::Items(p) if p.len() == 1));
    assert!(matches!(&state.children, RelatedSection::Items(c) if c[0].id == "HP:0002069"));
}

#[test]
fn failed_fetch_degrades_without_stuck_loading_placeholders() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    detail.apply_fetch("HP:0001250", failed_payload());

    let state = detail.state().unwrap();
    assert_eq!(state.display_definition(), "Definition not available");
    assert_eq!(state.genes, TextSection::Placeholder("Unable to load"));
    assert_eq!(state.diseases, TextSection::Placeholder("Unable to load"));
    assert_ne!(state.parents, RelatedSection::Loading);
    assert_ne!(state.children, RelatedSection::Loading);
}

#[test]
fn empty_synonyms_render_their_fallback() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    detail.apply_fetch(
        "HP:0001250",
        DetailData {
            core: CoreOutcome::Fetched(TermCore::default()),
            annotations: Some(Annotations::default()),
            parents: Some(Vec::new()),
            children: Some(Vec::new()),
        },
    );
    let state = detail.state().unwrap();
    assert_eq!(state.display_synonyms(), vec!["No synonyms available"]);
    assert_eq!(state.display_definition(), "No definition available");
}

#[test]
fn payload_for_a_superseded_term_is_dropped() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    // User opens a related term before the first payload lands.
    detail.open(Term::new("HP:0002069", "Bilateral tonic-clonic seizure"));

    detail.apply_fetch("HP:0001250", full_payload());

    let state = detail.state().unwrap();
    assert_eq!(state.term.id, "HP:0002069");
    assert_eq!(state.genes, TextSection::Loading);
}

#[test]
fn payload_after_close_is_dropped() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    detail.close();
    assert!(!detail.is_open());

    // Must not panic or resurrect the overlay.
    detail.apply_fetch("HP:0001250", full_payload());
    assert!(!detail.is_open());
    assert!(detail.current_id().is_none());
}

#[test]
fn copy_genes_joins_with_the_double_pipe_delimiter() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    detail.apply_fetch("HP:0001250", full_payload());

    let mut clipboard = MemoryClipboard::default();
    let copied = detail.copy_genes(&mut clipboard).unwrap();
    assert_eq!(copied, 2);
    assert_eq!(
        clipboard.last.as_deref(),
        Some(&*format!("SCN1A{}KCNQ2", GENE_COPY_DELIMITER))
    );
    assert!(detail.copy_flash_active());
}

#[test]
fn copy_genes_failure_surfaces_and_leaves_no_flash() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    detail.apply_fetch("HP:0001250", full_payload());

    let mut clipboard = MemoryClipboard {
        fail: true,
        ..Default::default()
    };
    assert!(detail.copy_genes(&mut clipboard).is_err());
    assert!(!detail.copy_flash_active());
}

#[test]
fn copy_genes_with_nothing_loaded_is_an_error() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    let mut clipboard = MemoryClipboard::default();
    assert!(detail.copy_genes(&mut clipboard).is_err());
}

#[test]
fn add_current_hands_back_the_enriched_term() {
    let mut detail = DetailController::new();
    detail.open(Term::new("HP:0001250", "Seizure"));
    detail.apply_fetch("HP:0001250", full_payload());

    let term = detail.current_term().unwrap();
    assert_eq!(term.id, "HP:0001250");
    assert_eq!(term.genes, vec!["SCN1A", "KCNQ2"]);
    assert_eq!(term.synonyms, vec!["Fit", "Convulsion"]);

    detail.close();
    assert!(detail.current_term().is_none());
}
