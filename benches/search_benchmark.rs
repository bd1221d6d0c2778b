use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nexus_indexer_core::coordinate::{ArtifactInfo, Maven2GavCalculator};
use nexus_indexer_core::index::IndexingContext;
use nexus_indexer_core::query::QueryCreator;
use nexus_indexer_core::schema::{CreatorRegistry, SearchType};
use nexus_indexer_core::search::{GroupIdGrouping, SearchEngine};
use nexus_indexer_core::storage::RamDirectory;
use std::sync::Arc;

fn artifact(n: usize) -> ArtifactInfo {
    ArtifactInfo {
        group_id: format!("org.example.group{}", n % 50),
        artifact_id: format!("artifact-{n}"),
        version: "1.0".to_string(),
        packaging: "jar".to_string(),
        extension: "jar".to_string(),
        repository_id: "central".to_string(),
        context_id: "central".to_string(),
        file_name: format!("artifact-{n}-1.0.jar"),
        size: 1024,
        last_modified: chrono::Utc::now(),
        ..Default::default()
    }
}

fn populated_context(doc_count: usize) -> Arc<IndexingContext> {
    let ctx = IndexingContext::open(
        "central",
        "central",
        "/repo",
        Arc::new(RamDirectory::new()),
        Arc::new(Maven2GavCalculator::new()),
        Arc::new(CreatorRegistry::default_set()),
        false,
    )
    .unwrap();
    for n in 0..doc_count {
        ctx.add_artifact(&artifact(n)).unwrap();
    }
    ctx.commit().unwrap();
    Arc::new(ctx)
}

fn bench_flat_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_search");

    for doc_count in [100, 1_000, 10_000].iter() {
        let ctx = populated_context(*doc_count);
        let creator = QueryCreator::new(Arc::new(ctx.creators().fields().clone()));
        let query = creator
            .create("groupId", "org.example.group7", SearchType::Exact)
            .unwrap();
        let engine = SearchEngine::new();

        group.bench_with_input(BenchmarkId::from_parameter(doc_count), doc_count, |b, _| {
            b.iter(|| {
                let _ = engine.flat_search(black_box(&[ctx.clone()]), black_box(&query), 1_000);
            });
        });
    }

    group.finish();
}

fn bench_grouped_search(c: &mut Criterion) {
    let ctx = populated_context(5_000);
    let creator = QueryCreator::new(Arc::new(ctx.creators().fields().clone()));
    let query = creator
        .create("groupId", "org.example.group3", SearchType::Exact)
        .unwrap();
    let engine = SearchEngine::new();

    c.bench_function("grouped_search_by_group_id", |b| {
        b.iter(|| {
            let _ = engine.grouped_search(black_box(&[ctx.clone()]), black_box(&query), &GroupIdGrouping);
        });
    });
}

fn bench_iterator_search(c: &mut Criterion) {
    let ctx = populated_context(5_000);
    let creator = QueryCreator::new(Arc::new(ctx.creators().fields().clone()));
    let query = creator
        .create("groupId", "org.example.group3", SearchType::Exact)
        .unwrap();
    let engine = SearchEngine::new();

    c.bench_function("iterator_search_drain", |b| {
        b.iter(|| {
            let cursor = engine
                .iterator_search(black_box(&[ctx.clone()]), black_box(&query), 0, None)
                .unwrap();
            for hit in cursor {
                black_box(hit);
            }
        });
    });
}

fn bench_wildcard_query_construction(c: &mut Criterion) {
    let ctx = populated_context(100);
    let creator = QueryCreator::new(Arc::new(ctx.creators().fields().clone()));

    c.bench_function("scored_wildcard_query_construction", |b| {
        b.iter(|| {
            let _ = creator.create(black_box("artifactId"), black_box("artifact-1*"), SearchType::Scored);
        });
    });
}

criterion_group!(
    benches,
    bench_flat_search,
    bench_grouped_search,
    bench_iterator_search,
    bench_wildcard_query_construction
);
criterion_main!(benches);
