pub mod analyzer;
pub mod token;

pub use analyzer::NexusAnalyzer;
pub use token::Token;
