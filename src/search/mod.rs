pub mod cursor;
pub mod engine;
pub mod matcher;
pub mod results;

pub use cursor::SearchCursor;
pub use engine::SearchEngine;
pub use results::{FlatSearchOutcome, GroupArtifactGrouping, GroupIdGrouping, Grouping};
