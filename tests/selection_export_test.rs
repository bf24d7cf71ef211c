use hpo_cli::export::TermExporter;
use hpo_cli::favorites::favorite;
use hpo_cli::selection::SelectionStore;
use hpo_cli::term::Term;

#[test]
fn favorite_shortcut_feeds_the_selection_with_dedup() {
    let mut store = SelectionStore::new();
    let fav = favorite(0).unwrap(); // Seizure
    assert!(store.add(Term::from(fav.clone())));

    // The same term arriving later from a search result is a no-op.
    let mut searched = Term::new(fav.id.clone(), "Seizure");
    searched.definition = Some("An epileptic event.".to_string());
    assert!(!store.add(searched));

    assert_eq!(store.count(), 1);
}

#[test]
fn export_writes_store_order_and_clear_disables_reexport() {
    let mut store = SelectionStore::new();
    store.add(Term::new("HP:0001250", "Seizure"));
    store.add(Term::new("HP:0000252", "Microcephaly"));

    let dir = tempfile::tempdir().unwrap();
    let outcome = TermExporter::export(&store, Some(dir.path()), "HPO.txt")
        .unwrap()
        .unwrap();
    assert_eq!(outcome.count, 2);

    let written = std::fs::read_to_string(dir.path().join("HPO.txt")).unwrap();
    assert_eq!(written, "Seizure\tHP:0001250\nMicrocephaly\tHP:0000252\n");

    // Clearing empties the store, disables export, and a second export
    // attempt is a no-op.
    store.clear();
    assert!(!store.export_enabled());
    let second = TermExporter::export(&store, Some(dir.path()), "HPO2.txt").unwrap();
    assert!(second.is_none());
    assert!(!dir.path().join("HPO2.txt").exists());
}

#[test]
fn removing_then_exporting_reflects_the_remaining_entries() {
    let mut store = SelectionStore::new();
    store.add(Term::new("HP:0001250", "Seizure"));
    store.add(Term::new("HP:0000252", "Microcephaly"));
    store.add(Term::new("HP:0001263", "Global developmental delay"));

    store.remove("HP:0000252");
    assert_eq!(
        TermExporter::render(&store),
        "Seizure\tHP:0001250\nGlobal developmental delay\tHP:0001263\n"
    );
}
