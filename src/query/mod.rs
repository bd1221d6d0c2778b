pub mod ast;
pub mod creator;

pub use ast::Query;
pub use creator::{QueryCreator, NOT_PRESENT};
