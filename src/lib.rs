pub mod core;
pub mod coordinate;
pub mod schema;
pub mod analysis;
pub mod storage;
pub mod index;
pub mod query;
pub mod search;
pub mod packer;

/*
┌────────────────────────────────────────────────────────────────────────────────────────────┐
│                         NEXUS-INDEXER-CORE STRUCT ARCHITECTURE                               │
└────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── COORDINATE LAYER ───────────────────────────────────────┐
│                                                                                              │
│  ┌──────────────────┐  ┌──────────────────────┐  ┌──────────────────────────────────────┐  │
│  │ struct Gav        │  │ struct ArtifactInfo   │  │ trait GavCalculator                  │  │
│  │ • group_id        │  │ • group_id            │  │ • gav_path(&Gav) -> String            │  │
│  │ • artifact_id      │ │ • artifact_id         │  │ • path_to_gav(&str) -> Option<Gav>    │  │
│  │ • version          │ │ • version             │  └──────────────────────────────────────┘  │
│  │ • base_version     │ │ • classifier          │                                             │
│  │ • classifier       │ │ • packaging           │  ┌──────────────────────────────────────┐   │
│  │ • extension        │ │ • extension           │  │ struct Maven2GavCalculator           │   │
│  │ • is_snapshot       │ │ • repository_id       │  │ (sole GavCalculator impl)            │   │
│  │ • snapshot_ts       │ │ • uinfo()             │  └──────────────────────────────────────┘   │
│  │ • build_number      │ │ • class_names         │                                             │
│  └──────────────────┘  └──────────────────────┘                                             │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────── SCHEMA LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────┐  ┌──────────────────────┐  ┌────────────────────────────┐      │
│  │ struct IndexerField    │  │ trait IndexCreator    │  │ struct CreatorRegistry     │      │
│  │ • ontology             │  │ • fields()            │  │ • creators: Vec<Box<dyn>>  │      │
│  │ • storage_key          │  │ • populate()          │  │ • populate()               │      │
│  │ • stored / indexed     │  │ • update_document()   │  │ • update_document()        │      │
│  │ • keyword              │  │ • update_artifact_info│  │ • update_artifact_info()   │      │
│  └────────────────────────┘  └──────────────────────┘  └────────────────────────────┘      │
│                                                                                              │
│  ┌──────────────────────────────────┐  ┌──────────────────────────────────┐                │
│  │ struct MinimalArtifactInfoCreator│  │ struct JarFileContentsCreator    │                │
│  └──────────────────────────────────┘  └──────────────────────────────────┘                │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── STORAGE LAYER ───────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────┐   ┌──────────────────────┐   ┌────────────────────────────┐        │
│  │ trait IndexDirectory│   │ struct FsDirectory   │   │ struct RamDirectory        │        │
│  │ • get/put/delete    │   │ (on-disk)            │   │ (in-memory)                │        │
│  │ • list()            │   └──────────────────────┘   └────────────────────────────┘        │
│  └────────────────────┘                                                                      │
│                                                                                              │
│  ┌────────────────────┐   ┌──────────────────────┐                                          │
│  │ struct FileLock     │   │ enum StoredDocument  │                                          │
│  │ (process exclusion) │   │ • Live(ArtifactInfo) │                                          │
│  └────────────────────┘   │ • Tombstone(String)  │                                          │
│                            │ • Descriptor(...)    │                                          │
│                            │ • GroupSet(...)      │                                          │
│                            └──────────────────────┘                                          │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── CONTEXT LAYER ───────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────────────────────────────────────────────────────────────────┐    │
│  │                           struct IndexingContext                                    │    │
│  │  ┌──────────────────────────────────────────────────────────────────────────────┐ │    │
│  │  │ id / repository_id / repository_path / repository_url / index_update_url     │ │    │
│  │  │ gav_calculator: Arc<dyn GavCalculator>                                       │ │    │
│  │  │ creators: Arc<CreatorRegistry>                                               │ │    │
│  │  │ state: Arc<RwLock<ContextState>>   // reader / writer / searcher triple      │ │    │
│  │  │ searchable: AtomicBool                                                       │ │    │
│  │  │ timestamp: Arc<RwLock<Option<DateTime<Utc>>>>                                │ │    │
│  │  └──────────────────────────────────────────────────────────────────────────────┘ │    │
│  └────────────────────────────────────────────────────────────────────────────────────┘    │
│                                                                                              │
│  ┌────────────────────────┐  ┌──────────────────────┐  ┌────────────────────────────┐      │
│  │ struct ContextState     │  │ struct Descriptor     │  │ struct GroupCache          │      │
│  │ • live: BTreeMap<UINFO,│  │ • version             │  │ • all_groups: BTreeSet     │      │
│  │   ArtifactInfo>        │  │ • repository_id       │  │ • root_groups: BTreeSet    │      │
│  │ • generation: u64      │  └──────────────────────┘  └────────────────────────────┘      │
│  └────────────────────────┘                                                                  │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────── QUERY LAYER ───────────────────────────────────────────┐
│                                                                                              │
│  ┌─────────────────────┐  ┌──────────────────────┐  ┌────────────────────────────┐         │
│  │ enum Query (AST)    │  │ struct QueryCreator   │  │ enum SearchType             │         │
│  │ • Term              │  │ • construct_query()   │  │ • Exact                     │         │
│  │ • Wildcard          │  │ • legacy fallback     │  │ • Scored                    │         │
│  │ • Prefix            │  └──────────────────────┘  └────────────────────────────┘         │
│  │ • Bool(And/Or)      │                                                                     │
│  │ • Phrase            │                                                                     │
│  └─────────────────────┘                                                                     │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────── SEARCH LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌─────────────────────┐  ┌──────────────────────┐  ┌────────────────────────────┐         │
│  │ struct SearchEngine │  │ trait Grouping        │  │ struct SearchIterator       │         │
│  │ • search_flat()     │  │ • fold()              │  │ (holds shared locks until   │         │
│  │ • search_grouped()  │  └──────────────────────┘  │  dropped, single-pass)      │         │
│  │ • search_iterator() │                            └────────────────────────────┘         │
│  └─────────────────────┘                                                                     │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────── PACKER LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌─────────────────────┐  ┌──────────────────────┐  ┌────────────────────────────┐         │
│  │ struct IndexPacker  │  │ struct PublicationState│ │ mod format (wire frame)    │         │
│  │ • pack()            │  │ • chain_id            │  │ • write_documents()        │         │
│  └─────────────────────┘  │ • last_incremental    │  │ • read_documents()         │         │
│                           │ • incremental[..]     │  └────────────────────────────┘         │
│                           └──────────────────────┘                                          │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── RELATIONSHIPS ───────────────────────────────────────────┐
│                                                                                              │
│  IndexingContext ──owns──> ContextState ──contains──> StoredDocument (via IndexDirectory)    │
│        │                                                                                    │
│        ├──owns──> GroupCache ──rebuilt_from──> live ArtifactInfo set                        │
│        │                                                                                    │
│        ├──populated_by──> CreatorRegistry ──delegates──> IndexCreator impls                 │
│        │                                                                                    │
│        └──searched_by──> SearchEngine ──builds_queries_with──> QueryCreator                 │
│                                                                                              │
│  IndexPacker ──reads──> IndexingContext (committed state) ──writes──> snapshot + chunks      │
│                                                                                              │
└──────────────────────────────────────────────────────────────────────────────────────────────┘
*/
