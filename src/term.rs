use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single HPO vocabulary entry. Only `id` and `name` are guaranteed to be
/// populated; the remaining fields are filled in lazily when the user opens
/// the detail view for the term.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub name: String,
    pub definition: Option<String>,
    pub synonyms: Vec<String>,
    pub genes: Vec<String>,
    pub diseases: Vec<String>,
    pub parents: Vec<TermRef>,
    pub children: Vec<TermRef>,
}

/// Minimal reference to a related term, as returned by the parents/children
/// endpoints and carried by favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRef {
    pub id: String,
    pub name: String,
}

impl Term {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Identity is the HPO id alone; a favorite stub and a fully detailed
    /// record with the same id are the same term.
    pub fn same_term(&self, other: &Term) -> bool {
        self.id == other.id
    }
}

impl From<TermRef> for Term {
    fn from(r: TermRef) -> Self {
        Term::new(r.id, r.name)
    }
}

impl TermRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Split a delimiter-joined synonym blob into trimmed, non-empty entries.
/// The search endpoint joins synonyms with semicolons.
pub fn split_synonym_blob(blob: &str) -> Vec<String> {
    blob.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize a synonym field that may arrive either as a semicolon-joined
/// string or as an array of strings. Anything else yields no synonyms.
pub fn synonyms_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(blob) => split_synonym_blob(blob),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blob_and_array_normalize_identically() {
        let from_blob = synonyms_from_value(&json!("tall stature; long fingers"));
        let from_array = synonyms_from_value(&json!(["tall stature", "long fingers"]));
        assert_eq!(from_blob, vec!["tall stature", "long fingers"]);
        assert_eq!(from_blob, from_array);
    }

    #[test]
    fn empty_and_whitespace_entries_are_dropped() {
        assert!(split_synonym_blob("").is_empty());
        assert!(split_synonym_blob(" ; ; ").is_empty());
        assert_eq!(split_synonym_blob("a;;b ; "), vec!["a", "b"]);
    }

    #[test]
    fn non_string_values_yield_no_synonyms() {
        assert!(synonyms_from_value(&json!(null)).is_empty());
        assert!(synonyms_from_value(&json!(42)).is_empty());
        assert_eq!(synonyms_from_value(&json!(["x", 3, " "])), vec!["x"]);
    }

    #[test]
    fn identity_is_the_id_alone() {
        let stub = Term::new("HP:0001250", "Seizure");
        let mut full = Term::new("HP:0001250", "Seizures");
        full.definition = Some("A sudden surge of electrical activity".into());
        assert!(stub.same_term(&full));
    }
}
