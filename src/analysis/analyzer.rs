//! The Nexus-specific analyser.
//!
//! There is exactly one pipeline: unicode lowercasing, then a split on
//! any non-alphanumeric character. It runs unchanged on the write path
//! (indexing a field value), the parse path (tokenising a query
//! string), and the count path (estimating a token count for query
//! construction) — divergence between those paths would silently break
//! query-wire compatibility with prior snapshots, so this is the one
//! place in the crate with no pluggable trait.

use crate::analysis::token::Token;

#[derive(Debug, Default, Clone, Copy)]
pub struct NexusAnalyzer;

impl NexusAnalyzer {
    pub fn new() -> Self {
        NexusAnalyzer
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut position = 0u32;
        for word in lowered.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            tokens.push(Token::new(word.to_string(), position));
            position += 1;
        }
        tokens
    }

    /// Number of tokens `text` analyses to, without allocating the
    /// token vector. Used by `QueryCreator` step 5 to decide whether a
    /// keyword-field fallback variant is worth constructing.
    pub fn count(&self, text: &str) -> usize {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .count()
    }
}
