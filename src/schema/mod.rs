pub mod creator;
pub mod creators;
pub mod document;
pub mod field;
pub mod registry;

pub use creator::{ArtifactContext, IndexCreator};
pub use document::Document;
pub use field::{FieldRegistry, IndexerField, SearchType};
pub use registry::CreatorRegistry;
