//! Result shapes for flat and grouped search.

use std::collections::BTreeMap;

use crate::coordinate::ArtifactInfo;

/// Flat search never returns a partial result set: either the hits that
/// matched, sorted by `UINFO` ascending, or the sentinel below, which is
/// deliberately not an `Error` — it is a normal, expected outcome of a
/// query too broad for the caller's limit.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatSearchOutcome {
    Hits(Vec<ArtifactInfo>),
    LimitExceeded,
}

impl FlatSearchOutcome {
    pub fn hits(&self) -> Option<&[ArtifactInfo]> {
        match self {
            FlatSearchOutcome::Hits(hits) => Some(hits),
            FlatSearchOutcome::LimitExceeded => None,
        }
    }
}

/// Folds a matched artifact into a caller-owned group map. Returning
/// `false` rejects the hit — it is not inserted anywhere and does not
/// count toward any cumulative limit the caller may be tracking.
pub trait Grouping: Send + Sync {
    fn fold(&self, groups: &mut BTreeMap<String, Vec<ArtifactInfo>>, info: ArtifactInfo) -> bool;
}

/// Groups by `groupId` alone.
pub struct GroupIdGrouping;

impl Grouping for GroupIdGrouping {
    fn fold(&self, groups: &mut BTreeMap<String, Vec<ArtifactInfo>>, info: ArtifactInfo) -> bool {
        groups.entry(info.group_id.clone()).or_default().push(info);
        true
    }
}

/// Groups by `groupId:artifactId`.
pub struct GroupArtifactGrouping;

impl Grouping for GroupArtifactGrouping {
    fn fold(&self, groups: &mut BTreeMap<String, Vec<ArtifactInfo>>, info: ArtifactInfo) -> bool {
        let key = format!("{}:{}", info.group_id, info.artifact_id);
        groups.entry(key).or_default().push(info);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> ArtifactInfo {
        ArtifactInfo {
            group_id: "org.example".into(),
            artifact_id: "widget".into(),
            version: "1.0".into(),
            packaging: "jar".into(),
            extension: "jar".into(),
            repository_id: "central".into(),
            context_id: "central".into(),
            file_name: "widget-1.0.jar".into(),
            size: 1,
            last_modified: Utc::now(),
            ..Default::default()
        }
    }

    #[test]
    fn group_id_grouping_buckets_by_group() {
        let mut groups = BTreeMap::new();
        assert!(GroupIdGrouping.fold(&mut groups, sample()));
        assert_eq!(groups.get("org.example").unwrap().len(), 1);
    }

    #[test]
    fn group_artifact_grouping_uses_compound_key() {
        let mut groups = BTreeMap::new();
        assert!(GroupArtifactGrouping.fold(&mut groups, sample()));
        assert!(groups.contains_key("org.example:widget"));
    }
}
