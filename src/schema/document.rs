//! The on-disk document shape `IndexCreator`s read and write.
//!
//! A `Document` is a flat multi-valued field map, keyed by `storageKey`
//! rather than logical field name — the same logical field (e.g.
//! `groupId`) commonly has two backing entries, a keyword variant and a
//! tokenized one, living under different storage keys.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    fields: BTreeMap<String, Vec<String>>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn set(&mut self, storage_key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(storage_key.into(), vec![value.into()]);
    }

    pub fn set_many(&mut self, storage_key: impl Into<String>, values: Vec<String>) {
        self.fields.insert(storage_key.into(), values);
    }

    pub fn get(&self, storage_key: &str) -> Option<&str> {
        self.fields
            .get(storage_key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, storage_key: &str) -> &[String] {
        self.fields
            .get(storage_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, storage_key: &str) -> bool {
        self.fields.contains_key(storage_key)
    }

    pub fn remove(&mut self, storage_key: &str) {
        self.fields.remove(storage_key);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip() {
        let mut doc = Document::new();
        doc.set("u", "org.example\u{1}widget\u{1}1.0\u{1}\u{1}jar");
        assert_eq!(
            doc.get("u"),
            Some("org.example\u{1}widget\u{1}1.0\u{1}\u{1}jar")
        );
        assert!(doc.get("missing").is_none());
    }

    #[test]
    fn set_many_preserves_order() {
        let mut doc = Document::new();
        doc.set_many("classnames", vec!["com/a/B".into(), "com/a/C".into()]);
        assert_eq!(doc.get_all("classnames"), ["com/a/B", "com/a/C"]);
    }
}
