//! `ArtifactInfo` — the canonical artifact record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit separator used to join `UINFO` fields, matching the glossary's
/// `groupId|artifactId|version|classifier|extension` definition (the pipe
/// in the prose is illustrative; the actual separator is ASCII unit
/// separator `\u{1}` so artifact coordinates containing `|` cannot corrupt
/// the key).
pub const UINFO_SEPARATOR: char = '\u{1}';

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArtifactInfo {
    // Identity
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    pub packaging: String,
    pub extension: String,

    // Location
    pub repository_id: String,
    pub context_id: String,
    pub file_name: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,

    // Content metadata
    pub name: Option<String>,
    pub description: Option<String>,
    pub sha1: Option<String>,
    pub md5: Option<String>,

    // Jar contents
    pub class_names: Vec<String>,
}

impl ArtifactInfo {
    /// `UINFO = groupId|artifactId|version|classifier|extension`.
    pub fn uinfo(&self) -> String {
        join_uinfo(
            &self.group_id,
            &self.artifact_id,
            &self.version,
            self.classifier.as_deref(),
            &self.extension,
        )
    }
}

pub fn join_uinfo(
    group_id: &str,
    artifact_id: &str,
    version: &str,
    classifier: Option<&str>,
    extension: &str,
) -> String {
    format!(
        "{group_id}{sep}{artifact_id}{sep}{version}{sep}{classifier}{sep}{extension}",
        sep = UINFO_SEPARATOR,
        classifier = classifier.unwrap_or(""),
    )
}

/// Splits a `UINFO` string back into its component fields. Returns `None`
/// if the string does not have exactly five unit-separated fields.
pub fn split_uinfo(uinfo: &str) -> Option<(String, String, String, Option<String>, String)> {
    let mut parts = uinfo.split(UINFO_SEPARATOR);
    let group_id = parts.next()?.to_string();
    let artifact_id = parts.next()?.to_string();
    let version = parts.next()?.to_string();
    let classifier = parts.next()?.to_string();
    let extension = parts.next()?.to_string();
    if parts.next().is_some() {
        return None;
    }
    let classifier = if classifier.is_empty() {
        None
    } else {
        Some(classifier)
    };
    Some((group_id, artifact_id, version, classifier, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArtifactInfo {
        ArtifactInfo {
            group_id: "org.apache.maven".into(),
            artifact_id: "maven-model".into(),
            version: "2.2.1".into(),
            classifier: None,
            packaging: "jar".into(),
            extension: "jar".into(),
            repository_id: "central".into(),
            context_id: "central".into(),
            file_name: "maven-model-2.2.1.jar".into(),
            size: 1024,
            last_modified: Utc::now(),
            name: None,
            description: None,
            sha1: None,
            md5: None,
            class_names: Vec::new(),
        }
    }

    #[test]
    fn uinfo_round_trips_through_split() {
        let info = sample();
        let uinfo = info.uinfo();
        let (g, a, v, c, e) = split_uinfo(&uinfo).expect("splits");
        assert_eq!(g, info.group_id);
        assert_eq!(a, info.artifact_id);
        assert_eq!(v, info.version);
        assert_eq!(c, info.classifier);
        assert_eq!(e, info.extension);
    }

    #[test]
    fn uinfo_distinguishes_classifier() {
        let mut with_classifier = sample();
        with_classifier.classifier = Some("sources".into());
        assert_ne!(sample().uinfo(), with_classifier.uinfo());
    }
}
