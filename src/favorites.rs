use crate::term::TermRef;

/// Quick-add shortcuts for frequently requested phenotype terms. Rendered as
/// a static bar; number keys add the corresponding entry to the selection.
pub const FAVORITES: &[(&str, &str)] = &[
    ("HP:0001250", "Seizure"),
    ("HP:0000252", "Microcephaly"),
    ("HP:0001263", "Global developmental delay"),
    ("HP:0001249", "Intellectual disability"),
    ("HP:0001252", "Hypotonia"),
    ("HP:0004322", "Short stature"),
    ("HP:0000256", "Macrocephaly"),
    ("HP:0001251", "Ataxia"),
    ("HP:0001290", "Generalized hypotonia"),
];

pub fn favorite(index: usize) -> Option<TermRef> {
    FAVORITES
        .get(index)
        .map(|(id, name)| TermRef::new(*id, *name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorites_resolve_by_index() {
        let first = favorite(0).unwrap();
        assert_eq!(first.id, "HP:0001250");
        assert_eq!(first.name, "Seizure");
        assert!(favorite(FAVORITES.len()).is_none());
    }

    #[test]
    fn favorite_ids_are_unique() {
        for (i, (id, _)) in FAVORITES.iter().enumerate() {
            assert!(
                !FAVORITES[i + 1..].iter().any(|(other, _)| other == id),
                "duplicate favorite id {id}"
            );
        }
    }
}
