//! Evaluates a `Query` against a single `Document`.
//!
//! Fields are not tagged keyword/tokenized at this layer — the document
//! only carries raw stored strings. A clause first tries an exact match
//! against the stored value (the only way a keyword field can match);
//! failing that it falls back to matching against the value's analysed
//! tokens, which is what makes the same code work for tokenized fields
//! without needing to consult the field registry here.

use regex::Regex;

use crate::analysis::NexusAnalyzer;
use crate::query::ast::Query;
use crate::schema::Document;

/// `true`/`false` membership test, for flat and grouped search.
pub fn matches(query: &Query, doc: &Document) -> bool {
    score(query, doc).is_some()
}

/// Match plus a relevance score, for the ranked iterator search. Returns
/// `None` when the clause does not match at all.
pub fn score(query: &Query, doc: &Document) -> Option<f32> {
    match query {
        Query::Term { field, value } => {
            any_value(doc, field, |v| term_matches(v, value)).then_some(1.0)
        }
        Query::Prefix { field, value, boost } => {
            any_value(doc, field, |v| prefix_matches(v, value)).then_some(*boost)
        }
        Query::Wildcard { field, pattern } => {
            any_value(doc, field, |v| wildcard_matches(v, pattern)).then_some(1.0)
        }
        Query::Phrase { field, terms } => {
            any_value(doc, field, |v| phrase_matches(v, terms)).then_some(1.0)
        }
        Query::Bool { must, should } => score_bool(must, should, doc),
    }
}

fn score_bool(must: &[Query], should: &[Query], doc: &Document) -> Option<f32> {
    let mut total = 0.0f32;
    for clause in must {
        total += score(clause, doc)?;
    }
    if should.is_empty() {
        return Some(total);
    }
    let best = should.iter().filter_map(|clause| score(clause, doc)).fold(None, |acc, s| {
        Some(acc.map_or(s, |a: f32| a.max(s)))
    });
    best.map(|s| total + s)
}

fn any_value(doc: &Document, field: &str, pred: impl Fn(&str) -> bool) -> bool {
    doc.get_all(field).iter().any(|v| pred(v))
}

fn term_matches(doc_value: &str, term: &str) -> bool {
    if doc_value == term {
        return true;
    }
    let wanted = term.to_lowercase();
    tokens_of(doc_value).iter().any(|t| t.text == wanted)
}

fn prefix_matches(doc_value: &str, prefix: &str) -> bool {
    if doc_value.starts_with(prefix) {
        return true;
    }
    let wanted = prefix.to_lowercase();
    tokens_of(doc_value).iter().any(|t| t.text.starts_with(&wanted))
}

fn wildcard_matches(doc_value: &str, pattern: &str) -> bool {
    if let Some(re) = wildcard_regex(pattern) {
        if re.is_match(doc_value) {
            return true;
        }
    }
    let wanted = wildcard_regex(&pattern.to_lowercase());
    match wanted {
        Some(re) => tokens_of(doc_value).iter().any(|t| re.is_match(&t.text)),
        None => false,
    }
}

fn phrase_matches(doc_value: &str, terms: &[String]) -> bool {
    if terms.is_empty() {
        return false;
    }
    let tokens = tokens_of(doc_value);
    if tokens.len() < terms.len() {
        return false;
    }
    tokens.windows(terms.len()).any(|window| {
        window
            .iter()
            .zip(terms)
            .all(|(token, term)| token.text == term.to_lowercase())
    })
}

fn tokens_of(value: &str) -> Vec<crate::analysis::Token> {
    NexusAnalyzer::new().analyze(value)
}

/// `*` and `?` glob syntax, converted to an anchored regex.
fn wildcard_regex(pattern: &str) -> Option<Regex> {
    let mut body = String::with_capacity(pattern.len() * 2);
    body.push('^');
    for c in pattern.chars() {
        match c {
            '*' => body.push_str(".*"),
            '?' => body.push('.'),
            other => body.push_str(&regex::escape(&other.to_string())),
        }
    }
    body.push('$');
    Regex::new(&body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(field: &str, value: &str) -> Document {
        let mut doc = Document::new();
        doc.set(field, value);
        doc
    }

    #[test]
    fn term_matches_exact_keyword_value() {
        let doc = doc_with("g", "org.apache.maven");
        let q = Query::Term {
            field: "g".into(),
            value: "org.apache.maven".into(),
        };
        assert!(matches(&q, &doc));
    }

    #[test]
    fn term_matches_tokenised_value_via_analyser() {
        let doc = doc_with("artifactId", "common-log");
        let q = Query::Term {
            field: "artifactId".into(),
            value: "common".into(),
        };
        assert!(matches(&q, &doc));
    }

    #[test]
    fn wildcard_does_not_match_unrelated_value() {
        let doc = doc_with("a", "log4j");
        let q = Query::Wildcard {
            field: "a".into(),
            pattern: "common-log*".into(),
        };
        assert!(!matches(&q, &doc));
    }

    #[test]
    fn prefix_and_clause_matches_a_longer_real_world_token() {
        // "common-log*" construction over artifactId="commons-logging":
        // each term is prefix-tolerant, so "common" matches the "commons"
        // token and "log" matches the "logging" token even though
        // neither is an exact token match.
        let doc = doc_with("artifactId", "commons-logging");
        let q = Query::and_all(vec![
            Query::Prefix {
                field: "artifactId".into(),
                value: "common".into(),
                boost: 1.0,
            },
            Query::Prefix {
                field: "artifactId".into(),
                value: "log".into(),
                boost: 1.0,
            },
        ]);
        assert!(matches(&q, &doc));
    }

    #[test]
    fn prefix_matches_token_boundary() {
        let doc = doc_with("artifactId", "common-log");
        let q = Query::Prefix {
            field: "artifactId".into(),
            value: "log".into(),
            boost: 1.0,
        };
        assert!(matches(&q, &doc));
    }

    #[test]
    fn bool_must_requires_every_clause() {
        let doc = doc_with("artifactId", "common-log");
        let q = Query::and_all(vec![
            Query::Term {
                field: "artifactId".into(),
                value: "common".into(),
            },
            Query::Term {
                field: "artifactId".into(),
                value: "missing".into(),
            },
        ]);
        assert!(!matches(&q, &doc));
    }

    #[test]
    fn bool_should_matches_on_any_clause() {
        let doc = doc_with("p", "jar");
        let q = Query::or(
            Query::Term {
                field: "p".into(),
                value: "jar".into(),
            },
            Query::Term {
                field: "p".into(),
                value: "pom".into(),
            },
        );
        assert_eq!(score(&q, &doc), Some(1.0));
    }
}
