//! `SearchCursor` — the lazy, single-pass iterator search form.
//!
//! Modelled on a `StreamingResults`/`StreamingCursor` pair, generalized
//! from a single-reader batch fetch to a ranked union across every
//! participating context. Rather than holding a `parking_lot::RwLock`
//! guard for the cursor's lifetime, this cursor holds each context's
//! snapshot `Arc` instead — cheaper, and equally effective at keeping
//! the document set the cursor was built against alive and unchanged
//! until the cursor is dropped.

use std::collections::HashSet;
use std::sync::Arc;

use crate::coordinate::ArtifactInfo;
use crate::core::error::Result;
use crate::index::IndexingContext;
use crate::query::ast::Query;
use crate::search::matcher;
use crate::storage::StoredDocument;

pub struct SearchCursor {
    hits: std::vec::IntoIter<ArtifactInfo>,
    // Held only to keep the snapshots this cursor was built from alive;
    // never read again once `build` returns.
    _snapshots: Vec<Arc<Vec<StoredDocument>>>,
}

impl SearchCursor {
    pub(super) fn build(
        contexts: &[Arc<IndexingContext>],
        query: &Query,
        start: usize,
        count: Option<usize>,
        force: bool,
    ) -> Result<SearchCursor> {
        let mut snapshots = Vec::with_capacity(contexts.len());
        let mut seen: HashSet<(String, String)> = HashSet::new();
        // (score, ctx_index, doc_index) ordering key, best first.
        let mut scored: Vec<((f32, usize, usize), ArtifactInfo)> = Vec::new();

        for (ctx_index, ctx) in contexts.iter().enumerate() {
            if !force && !ctx.is_searchable() {
                continue;
            }
            let snapshot = ctx.snapshot()?;
            for (doc_index, doc) in snapshot.iter().enumerate() {
                let StoredDocument::Live(fields) = doc else {
                    continue;
                };
                let Some(score) = matcher::score(query, fields) else {
                    continue;
                };
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
                scored.push(((score, ctx_index, doc_index), info));
            }
            snapshots.push(snapshot);
        }

        scored.sort_by(|a, b| {
            b.0 .0
                .partial_cmp(&a.0 .0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then((a.0 .1, a.0 .2).cmp(&(b.0 .1, b.0 .2)))
        });

        let windowed: Vec<ArtifactInfo> = scored
            .into_iter()
            .map(|(_, info)| info)
            .skip(start)
            .take(count.unwrap_or(usize::MAX))
            .collect();

        Ok(SearchCursor {
            hits: windowed.into_iter(),
            _snapshots: snapshots,
        })
    }
}

impl Iterator for SearchCursor {
    type Item = ArtifactInfo;

    fn next(&mut self) -> Option<ArtifactInfo> {
        self.hits.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Maven2GavCalculator;
    use crate::query::QueryCreator;
    use crate::schema::{CreatorRegistry, SearchType};
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

    #[test]
    fn cursor_respects_start_and_count_bounds() {
        let a = ctx_with("alpha");
        let b = ctx_with("beta");
        let registry = CreatorRegistry::default_set();
        let creator = QueryCreator::new(Arc::new(registry.fields().clone()));
        let query = creator
            .create("groupId", "org.example", SearchType::Exact)
            .unwrap();

        let all: Vec<ArtifactInfo> =
            SearchCursor::build(&[a.clone(), b.clone()], &query, 0, None, false)
                .unwrap()
                .collect();
        assert_eq!(all.len(), 2);

        let paged: Vec<ArtifactInfo> =
            SearchCursor::build(&[a, b], &query, 1, Some(1), false)
                .unwrap()
                .collect();
        assert_eq!(paged.len(), 1);
    }

    #[test]
    fn cursor_construction_fails_cleanly_on_closed_context() {
        let ctx = ctx_with("widget");
        ctx.close(false).unwrap();
        let registry = CreatorRegistry::default_set();
        let creator = QueryCreator::new(Arc::new(registry.fields().clone()));
        let query = creator
            .create("groupId", "org.example", SearchType::Exact)
            .unwrap();
        assert!(SearchCursor::build(&[ctx], &query, 0, None, false).is_err());
    }
}
