use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::selection::SelectionStore;

/// Writes the current selection to a plain-text file, one `name<TAB>id`
/// line per term in selection order.
pub struct TermExporter;

/// What an export produced, for the status line.
pub struct ExportOutcome {
    pub path: PathBuf,
    pub count: usize,
}

impl ExportOutcome {
    pub fn status_message(&self) -> String {
        format!("Exported {} terms to {}", self.count, self.path.display())
    }
}

impl TermExporter {
    /// Serialize the selection. Each entry becomes `"<name>\t<id>\n"`.
    pub fn render(store: &SelectionStore) -> String {
        let mut out = String::new();
        for term in store.iter() {
            out.push_str(&term.name);
            out.push('\t');
            out.push_str(&term.id);
            out.push('\n');
        }
        out
    }

    /// Write the selection to `filename` under `dir` (the current directory
    /// when `dir` is `None`). An empty selection is a no-op and returns
    /// `Ok(None)`.
    pub fn export(
        store: &SelectionStore,
        dir: Option<&Path>,
        filename: &str,
    ) -> Result<Option<ExportOutcome>> {
        if store.is_empty() {
            return Ok(None);
        }

        let path = match dir {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        };

        let mut file = File::create(&path)?;
        file.write_all(Self::render(store).as_bytes())?;

        let outcome = ExportOutcome {
            path,
            count: store.count(),
        };
        info!(target: "export", path = %outcome.path.display(), count = outcome.count, "wrote selection");
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn sample_store() -> SelectionStore {
        let mut store = SelectionStore::new();
        store.add(Term::new("HP:0001250", "Seizure"));
        store.add(Term::new("HP:0000252", "Microcephaly"));
        store
    }

    #[test]
    fn renders_exact_tab_separated_lines() {
        let store = sample_store();
        assert_eq!(
            TermExporter::render(&store),
            "Seizure\tHP:0001250\nMicrocephaly\tHP:0000252\n"
        );
    }

    #[test]
    fn empty_store_is_a_noop() {
        let store = SelectionStore::new();
        let dir = tempfile::tempdir().unwrap();
        let outcome = TermExporter::export(&store, Some(dir.path()), "HPO.txt").unwrap();
        assert!(outcome.is_none());
        assert!(!dir.path().join("HPO.txt").exists());
    }

    #[test]
    fn writes_file_with_default_name() {
        let store = sample_store();
        let dir = tempfile::tempdir().unwrap();
        let outcome = TermExporter::export(&store, Some(dir.path()), "HPO.txt")
            .unwrap()
            .expect("non-empty store exports");

        assert_eq!(outcome.count, 2);
        let written = std::fs::read_to_string(dir.path().join("HPO.txt")).unwrap();
        assert_eq!(written, "Seizure\tHP:0001250\nMicrocephaly\tHP:0000252\n");
        assert!(outcome.status_message().contains("2 terms"));
    }
}
