pub mod context;
pub mod descriptor;
pub mod group_cache;
pub mod writer;

pub use context::IndexingContext;
