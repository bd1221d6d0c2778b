//! The structured query `QueryCreator` builds.

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Term {
        field: String,
        value: String,
    },
    Prefix {
        field: String,
        value: String,
        boost: f32,
    },
    Wildcard {
        field: String,
        pattern: String,
    },
    Phrase {
        field: String,
        terms: Vec<String>,
    },
    /// `must` clauses are ANDed, `should` clauses are ORed; a bool query
    /// with only `should` entries is a plain OR, matching how this
    /// crate only ever constructs flat AND or flat OR groups (spec
    /// §4.D never nests both in the same node).
    Bool {
        must: Vec<Query>,
        should: Vec<Query>,
    },
}

impl Query {
    pub fn or(left: Query, right: Query) -> Query {
        Query::Bool {
            must: Vec::new(),
            should: vec![left, right],
        }
    }

    pub fn and_all(clauses: Vec<Query>) -> Query {
        Query::Bool {
            must: clauses,
            should: Vec::new(),
        }
    }
}
