use tracing::debug;

use crate::term::Term;

/// The user-curated working list of terms. Insertion order is the display
/// and export order; at most one entry per HPO id.
#[derive(Debug, Default)]
pub struct SelectionStore {
    terms: Vec<Term>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term unless one with the same id is already present.
    /// Returns true when the store changed.
    pub fn add(&mut self, term: Term) -> bool {
        if self.contains(&term.id) {
            debug!(target: "selection", id = %term.id, "already selected");
            return false;
        }
        debug!(target: "selection", id = %term.id, name = %term.name, "added");
        self.terms.push(term);
        true
    }

    /// Remove the entry with the given id, if present. Returns true when an
    /// entry was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.terms.len();
        self.terms.retain(|t| t.id != id);
        before != self.terms.len()
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.terms.iter().any(|t| t.id == id)
    }

    pub fn count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Export is only offered for a non-empty selection.
    pub fn export_enabled(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Human-readable size label for the selection pane title.
    pub fn count_label(&self) -> String {
        match self.terms.len() {
            1 => "1 term".to_string(),
            n => format!("{} terms", n),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.terms.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Term> {
        self.terms.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: &str, name: &str) -> Term {
        Term::new(id, name)
    }

    #[test]
    fn add_deduplicates_by_id_and_keeps_order() {
        let mut store = SelectionStore::new();
        assert!(store.add(term("HP:0001250", "Seizure")));
        assert!(store.add(term("HP:0000252", "Microcephaly")));
        // Same id, different name: still the same term.
        assert!(!store.add(term("HP:0001250", "Seizures")));

        assert_eq!(store.count(), 2);
        let ids: Vec<&str> = store.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["HP:0001250", "HP:0000252"]);
        assert_eq!(store.get(0).unwrap().name, "Seizure");
    }

    #[test]
    fn remove_missing_id_is_a_noop() {
        let mut store = SelectionStore::new();
        store.add(term("HP:0001250", "Seizure"));
        assert!(!store.remove("HP:9999999"));
        assert_eq!(store.count(), 1);
        assert!(store.remove("HP:0001250"));
        assert!(store.is_empty());
    }

    #[test]
    fn clear_disables_export() {
        let mut store = SelectionStore::new();
        store.add(term("HP:0001250", "Seizure"));
        assert!(store.export_enabled());
        store.clear();
        assert_eq!(store.count(), 0);
        assert!(!store.export_enabled());
    }

    #[test]
    fn count_label_pluralizes() {
        let mut store = SelectionStore::new();
        assert_eq!(store.count_label(), "0 terms");
        store.add(term("HP:0001250", "Seizure"));
        assert_eq!(store.count_label(), "1 term");
        store.add(term("HP:0000252", "Microcephaly"));
        assert_eq!(store.count_label(), "2 terms");
    }
}
