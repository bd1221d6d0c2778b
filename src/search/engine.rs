//! `SearchEngine` — flat, grouped, and streaming search across one or
//! many `IndexingContext`s.
//!
//! Modelled on a stateless `QueryExecutor`: no field here owns index
//! data, every method takes the contexts to search as an argument, and
//! all three modes share the `matcher` module instead of each
//! re-implementing query evaluation.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::coordinate::ArtifactInfo;
use crate::core::error::Result;
use crate::index::IndexingContext;
use crate::query::ast::Query;
use crate::search::matcher;
use crate::search::results::{FlatSearchOutcome, Grouping};
use crate::storage::StoredDocument;

#[derive(Debug, Default, Clone, Copy)]
pub struct SearchEngine;

impl SearchEngine {
    pub fn new() -> Self {
        SearchEngine
    }

    /// Respects each context's `searchable` flag.
    pub fn flat_search(
        &self,
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        result_hit_limit: usize,
    ) -> Result<FlatSearchOutcome> {
        self.flat_search_inner(contexts, query, result_hit_limit, false)
    }

    /// Ignores each context's `searchable` flag.
    pub fn force_flat_search(
        &self,
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        result_hit_limit: usize,
    ) -> Result<FlatSearchOutcome> {
        self.flat_search_inner(contexts, query, result_hit_limit, true)
    }

    fn flat_search_inner(
        &self,
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        result_hit_limit: usize,
        force: bool,
    ) -> Result<FlatSearchOutcome> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut hits: BTreeMap<String, ArtifactInfo> = BTreeMap::new();

        for ctx in contexts {
            if !force && !ctx.is_searchable() {
                continue;
            }
            let snapshot = ctx.snapshot()?;
            for doc in snapshot.iter() {
                let StoredDocument::Live(fields) = doc else {
                    continue;
                };
                if !matcher::matches(query, fields) {
                    continue;
                }
                let Some(uinfo) = fields.get("u") else {
                    continue;
                };
                if !seen.insert((ctx.repository_id().to_string(), uinfo.to_string())) {
                    continue;
                }
                let mut info = ArtifactInfo::default();
                if !ctx.creators().read(fields, &mut info) {
                    continue;
                }
                if hits.len() >= result_hit_limit {
                    return Ok(FlatSearchOutcome::LimitExceeded);
                }
                hits.insert(uinfo.to_string(), info);
            }
        }

        Ok(FlatSearchOutcome::Hits(hits.into_values().collect()))
    }

    pub fn grouped_search(
        &self,
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        grouping: &dyn Grouping,
    ) -> Result<BTreeMap<String, Vec<ArtifactInfo>>> {
        self.grouped_search_inner(contexts, query, grouping, false)
    }

    pub fn force_grouped_search(
        &self,
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        grouping: &dyn Grouping,
    ) -> Result<BTreeMap<String, Vec<ArtifactInfo>>> {
        self.grouped_search_inner(contexts, query, grouping, true)
    }

    fn grouped_search_inner(
        &self,
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        grouping: &dyn Grouping,
        force: bool,
    ) -> Result<BTreeMap<String, Vec<ArtifactInfo>>> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut groups: BTreeMap<String, Vec<ArtifactInfo>> = BTreeMap::new();

        for ctx in contexts {
            if !force && !ctx.is_searchable() {
                continue;
            }
            let snapshot = ctx.snapshot()?;
            for doc in snapshot.iter() {
                let StoredDocument::Live(fields) = doc else {
                    continue;
                };
                if !matcher::matches(query, fields) {
                    continue;
                }
                let Some(uinfo) = fields.get("u") else {
                    continue;
                };
                if !seen.insert((ctx.repository_id().to_string(), uinfo.to_string())) {
                    continue;
                }
                let mut info = ArtifactInfo::default();
                if !ctx.creators().read(fields, &mut info) {
                    continue;
                }
                grouping.fold(&mut groups, info);
            }
        }

        Ok(groups)
    }

    /// Builds a lazy, single-pass cursor ordered by `(score desc, docId
    /// asc)`. The cursor keeps every participating context's snapshot
    /// `Arc` alive until it is dropped — see `search::cursor` for why
    /// that stands in for holding shared locks until the cursor closes.
    pub fn iterator_search(
        &self,
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        start: usize,
        count: Option<usize>,
    ) -> Result<super::cursor::SearchCursor> {
        super::cursor::SearchCursor::build(contexts, query, start, count, false)
    }

    pub fn force_iterator_search(
        &self,
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        start: usize,
        count: Option<usize>,
    ) -> Result<super::cursor::SearchCursor> {
        super::cursor::SearchCursor::build(contexts, query, start, count, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Maven2GavCalculator;
    use crate::query::QueryCreator;
    use crate::schema::{CreatorRegistry, FieldRegistry, SearchType};
    use crate::storage::RamDirectory;

    fn ctx_with(artifact_id: &str) -> Arc<IndexingContext> {
        let creators = Arc::new(CreatorRegistry::default_set());
        let ctx = IndexingContext::open(
            "central",
            "central",
            "/repo",
            Arc::new(RamDirectory::new()),
            Arc::new(Maven2GavCalculator::new()),
            creators,
            false,
        )
        .unwrap();
        ctx.add_artifact(&ArtifactInfo {
            group_id: "org.example".into(),
            artifact_id: artifact_id.into(),
            version: "1.0".into(),
            packaging: "jar".into(),
            extension: "jar".into(),
            repository_id: "central".into(),
            context_id: "central".into(),
            file_name: format!("{artifact_id}-1.0.jar"),
            size: 1,
            last_modified: chrono::Utc::now(),
            ..Default::default()
        })
        .unwrap();
        ctx.commit().unwrap();
        Arc::new(ctx)
    }

    fn fields() -> Arc<FieldRegistry> {
        Arc::new(CreatorRegistry::default_set().fields().clone())
    }

    #[test]
    fn flat_search_finds_exact_group_match() {
        let ctx = ctx_with("widget");
        let creator = QueryCreator::new(fields());
        let query = creator
            .create("groupId", "org.example", SearchType::Exact)
            .unwrap();
        let outcome = SearchEngine::new().flat_search(&[ctx], &query, 100).unwrap();
        let hits = outcome.hits().unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].artifact_id, "widget");
    }

    #[test]
    fn flat_search_respects_hit_limit() {
        let ctx = ctx_with("widget");
        let creator = QueryCreator::new(fields());
        let query = creator
            .create("groupId", "org.example", SearchType::Exact)
            .unwrap();
        let outcome = SearchEngine::new().flat_search(&[ctx], &query, 0).unwrap();
        assert_eq!(outcome, FlatSearchOutcome::LimitExceeded);
    }

    #[test]
    fn flat_search_skips_non_searchable_context_unless_forced() {
        let ctx = ctx_with("widget");
        ctx.set_searchable(false);
        let creator = QueryCreator::new(fields());
        let query = creator
            .create("groupId", "org.example", SearchType::Exact)
            .unwrap();
        let engine = SearchEngine::new();
        let outcome = engine.flat_search(&[ctx.clone()], &query, 100).unwrap();
        assert_eq!(outcome.hits().unwrap().len(), 0);

        let forced = engine.force_flat_search(&[ctx], &query, 100).unwrap();
        assert_eq!(forced.hits().unwrap().len(), 1);
    }

    #[test]
    fn grouped_search_buckets_by_group_id() {
        let ctx = ctx_with("widget");
        let creator = QueryCreator::new(fields());
        let query = creator
            .create("groupId", "org.example", SearchType::Exact)
            .unwrap();
        let groups = SearchEngine::new()
            .grouped_search(&[ctx], &query, &crate::search::results::GroupIdGrouping)
            .unwrap();
        assert_eq!(groups.get("org.example").unwrap().len(), 1);
    }

    #[test]
    fn iterator_search_yields_hits_in_order() {
        let ctx = ctx_with("widget");
        let creator = QueryCreator::new(fields());
        let query = creator
            .create("groupId", "org.example", SearchType::Exact)
            .unwrap();
        let mut cursor = SearchEngine::new()
            .iterator_search(&[ctx], &query, 0, None)
            .unwrap();
        let first = cursor.next();
        assert!(first.is_some());
        assert!(cursor.next().is_none());
    }
}
