//! `IndexerField` declarations and logical-to-physical field resolution.

/// Which side of the query path a field resolution is for. `Exact` prefers
/// a keyword (untokenized) backing field; `Scored` prefers a tokenized one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Exact,
    Scored,
}

/// A single schema element: an `ontology` (symbolic) name paired with the
/// on-disk `storageKey` it is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerField {
    pub ontology: String,
    pub storage_key: String,
    pub stored: bool,
    pub indexed: bool,
    pub keyword: bool,
}

impl IndexerField {
    pub fn keyword(ontology: &str, storage_key: &str) -> Self {
        IndexerField {
            ontology: ontology.to_string(),
            storage_key: storage_key.to_string(),
            stored: true,
            indexed: true,
            keyword: true,
        }
    }

    pub fn tokenized(ontology: &str, storage_key: &str) -> Self {
        IndexerField {
            ontology: ontology.to_string(),
            storage_key: storage_key.to_string(),
            stored: true,
            indexed: true,
            keyword: false,
        }
    }
}

/// Maps logical field names (`groupId`, `classnames`, ...) to the ordered
/// list of `IndexerField`s that back them, as declared across the active
/// `IndexCreator` set.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    // derive(Clone) makes `Arc::new(registry.fields().clone())` cheap
    // enough for `QueryCreator` to own an independent copy.
    by_ontology: std::collections::BTreeMap<String, Vec<IndexerField>>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        FieldRegistry::default()
    }

    pub fn declare(&mut self, field: IndexerField) {
        self.by_ontology
            .entry(field.ontology.clone())
            .or_default()
            .push(field);
    }

    /// Prefers the keyword variant for `Exact`, the tokenized variant
    /// for `Scored`. If no variant matches the preference, falls back
    /// to the last declared field.
    pub fn resolve(&self, ontology: &str, search_type: SearchType) -> Option<&IndexerField> {
        let candidates = self.by_ontology.get(ontology)?;
        let want_keyword = matches!(search_type, SearchType::Exact);
        candidates
            .iter()
            .find(|f| f.keyword == want_keyword)
            .or_else(|| candidates.last())
    }

    pub fn all(&self, ontology: &str) -> &[IndexerField] {
        self.by_ontology
            .get(ontology)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reverse lookup by on-disk storage key, used by the packer's wire
    /// writer to tell a keyword from a tokenized field when it has only
    /// a `Document` (storage keys), not an `ontology` name, in hand.
    pub fn find_by_storage_key(&self, storage_key: &str) -> Option<&IndexerField> {
        self.by_ontology
            .values()
            .flatten()
            .find(|f| f.storage_key == storage_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_keyword_for_exact() {
        let mut reg = FieldRegistry::new();
        reg.declare(IndexerField::tokenized("groupId", "groupId"));
        reg.declare(IndexerField::keyword("groupId", "g"));

        let exact = reg.resolve("groupId", SearchType::Exact).unwrap();
        assert!(exact.keyword);
        assert_eq!(exact.storage_key, "g");

        let scored = reg.resolve("groupId", SearchType::Scored).unwrap();
        assert!(!scored.keyword);
        assert_eq!(scored.storage_key, "groupId");
    }

    #[test]
    fn resolve_falls_back_to_last_declared() {
        let mut reg = FieldRegistry::new();
        reg.declare(IndexerField::keyword("name", "n"));

        let scored = reg.resolve("name", SearchType::Scored).unwrap();
        assert_eq!(scored.storage_key, "n");
    }

    #[test]
    fn resolve_unknown_field_is_none() {
        let reg = FieldRegistry::new();
        assert!(reg.resolve("nope", SearchType::Exact).is_none());
    }

    #[test]
    fn find_by_storage_key_locates_declared_field() {
        let mut reg = FieldRegistry::new();
        reg.declare(IndexerField::tokenized("groupId", "groupId"));
        let found = reg.find_by_storage_key("groupId").unwrap();
        assert!(!found.keyword);
        assert!(reg.find_by_storage_key("nope").is_none());
    }
}
