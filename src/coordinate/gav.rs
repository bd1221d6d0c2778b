//! Maven2 coordinate ↔ repository path mapping.
//!
//! `GavCalculator` is a pure, bidirectional mapping with no I/O. The path
//! grammar for a release artifact is
//! `<groupPath>/<artifactId>/<version>/<artifactId>-<version>[-<classifier>].<ext>`;
//! for a snapshot, the filename's version segment is instead
//! `<baseVersion>-<YYYYMMDD.HHMMSS>-<buildNumber>` while the directory
//! segment stays `<baseVersion>-SNAPSHOT`.

/// Extensions recognised by the parser, longest first so the "longest
/// suffix matching `.<known-ext>` wins" tie-break falls out of a simple
/// linear scan instead of needing a dedicated trie.
const KNOWN_EXTENSIONS: &[&str] = &[
    "tar.gz", "tar.bz2", "pom.asc", "jar.asc", "module",
    "jar", "pom", "war", "ear", "zip", "xml", "txt", "asc",
    "sha1", "sha256", "sha512", "md5", "so", "dll", "exe",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gav {
    pub group_id: String,
    pub artifact_id: String,
    /// The directory-level version, e.g. `1.0-SNAPSHOT` or `1.0`.
    pub version: String,
    /// `version` with any `-SNAPSHOT` suffix stripped.
    pub base_version: String,
    pub classifier: Option<String>,
    pub extension: String,
    pub is_snapshot: bool,
    /// `YYYYMMDD.HHMMSS`, present only for a timestamped snapshot file.
    pub snapshot_timestamp: Option<String>,
    pub build_number: Option<u32>,
}

impl Gav {
    pub fn is_release(&self) -> bool {
        !self.is_snapshot
    }
}

pub trait GavCalculator: Send + Sync {
    /// Render a `Gav` as the repository-relative path it lives at.
    fn gav_path(&self, gav: &Gav) -> String;

    /// Parse a repository-relative path into a `Gav`, or `None` if the
    /// path does not match the Maven2 layout grammar.
    fn path_to_gav(&self, path: &str) -> Option<Gav>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Maven2GavCalculator;

impl Maven2GavCalculator {
    pub fn new() -> Self {
        Maven2GavCalculator
    }

    fn split_extension(file_name: &str) -> Option<(&str, &str)> {
        let mut best: Option<(&str, &str)> = None;
        for ext in KNOWN_EXTENSIONS {
            let suffix = format!(".{ext}");
            if let Some(stem) = file_name.strip_suffix(&suffix) {
                let is_longer = best.map(|(_, e)| ext.len() > e.len()).unwrap_or(true);
                if is_longer {
                    best = Some((stem, ext));
                }
            }
        }
        best
    }

    fn is_snapshot_version(version: &str) -> bool {
        version.ends_with("-SNAPSHOT")
    }
}

impl GavCalculator for Maven2GavCalculator {
    fn gav_path(&self, gav: &Gav) -> String {
        let group_path = gav.group_id.replace('.', "/");
        let file_version = if gav.is_snapshot {
            let ts = gav.snapshot_timestamp.as_deref().unwrap_or("00000000.000000");
            let bn = gav.build_number.unwrap_or(1);
            format!("{}-{}-{}", gav.base_version, ts, bn)
        } else {
            gav.version.clone()
        };

        let mut file_name = format!("{}-{}", gav.artifact_id, file_version);
        if let Some(classifier) = &gav.classifier {
            file_name.push('-');
            file_name.push_str(classifier);
        }
        file_name.push('.');
        file_name.push_str(&gav.extension);

        format!(
            "{}/{}/{}/{}",
            group_path, gav.artifact_id, gav.version, file_name
        )
    }

    fn path_to_gav(&self, path: &str) -> Option<Gav> {
        let path = path.trim_start_matches('/');
        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 4 {
            return None;
        }

        let file_name = segments[segments.len() - 1];
        let version_dir = segments[segments.len() - 2];
        let artifact_id = segments[segments.len() - 3];
        let group_id = segments[..segments.len() - 3].join(".");

        if group_id.is_empty() || artifact_id.is_empty() || version_dir.is_empty() {
            return None;
        }

        let (stem, extension) = Self::split_extension(file_name)?;

        let prefix = format!("{artifact_id}-");
        let remainder = stem.strip_prefix(&prefix)?;

        let is_snapshot = Self::is_snapshot_version(version_dir);
        let base_version = version_dir
            .strip_suffix("-SNAPSHOT")
            .unwrap_or(version_dir)
            .to_string();

        if is_snapshot {
            parse_snapshot_remainder(remainder, &base_version).map(
                |(classifier, timestamp, build_number)| Gav {
                    group_id,
                    artifact_id: artifact_id.to_string(),
                    version: version_dir.to_string(),
                    base_version,
                    classifier,
                    extension: extension.to_string(),
                    is_snapshot: true,
                    snapshot_timestamp: Some(timestamp),
                    build_number: Some(build_number),
                },
            )
        } else {
            let classifier = parse_release_classifier(remainder, version_dir);
            Some(Gav {
                group_id,
                artifact_id: artifact_id.to_string(),
                version: version_dir.to_string(),
                base_version,
                classifier,
                extension: extension.to_string(),
                is_snapshot: false,
                snapshot_timestamp: None,
                build_number: None,
            })
        }
    }
}

/// `remainder` is everything after `<artifactId>-` and before the
/// extension. For a release this is `<version>[-<classifier>]`; the
/// classifier is whatever trails `version_dir` minus the leading dash.
fn parse_release_classifier(remainder: &str, version_dir: &str) -> Option<String> {
    if remainder == version_dir {
        return None;
    }
    remainder
        .strip_prefix(version_dir)
        .and_then(|rest| rest.strip_prefix('-'))
        .map(str::to_string)
}

/// `remainder` is `<baseVersion>-<YYYYMMDD.HHMMSS>-<buildNumber>[-<classifier>]`.
fn parse_snapshot_remainder(
    remainder: &str,
    base_version: &str,
) -> Option<(Option<String>, String, u32)> {
    let rest = remainder.strip_prefix(base_version)?.strip_prefix('-')?;
    let mut parts = rest.splitn(3, '-');
    let date = parts.next()?;
    let time_and_tail = parts.next()?;
    let mut time_parts = time_and_tail.splitn(2, '-');
    let time = time_parts.next()?;
    let timestamp = format!("{date}.{time}");
    if !is_snapshot_timestamp(&timestamp) {
        return None;
    }

    let tail = match (time_parts.next(), parts.next()) {
        (Some(a), Some(b)) => format!("{a}-{b}"),
        (Some(a), None) => a.to_string(),
        (None, Some(b)) => b.to_string(),
        (None, None) => return None,
    };

    let mut tail_parts = tail.splitn(2, '-');
    let build_number: u32 = tail_parts.next()?.parse().ok()?;
    let classifier = tail_parts.next().map(str::to_string);

    Some((classifier, timestamp, build_number))
}

fn is_snapshot_timestamp(s: &str) -> bool {
    let Some((date, time)) = s.split_once('.') else {
        return false;
    };
    date.len() == 8
        && date.chars().all(|c| c.is_ascii_digit())
        && time.len() == 6
        && time.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_round_trip() {
        let calc = Maven2GavCalculator::new();
        let path = "org/apache/maven/maven-model/2.2.1/maven-model-2.2.1.jar";
        let gav = calc.path_to_gav(path).expect("parses");
        assert_eq!(gav.group_id, "org.apache.maven");
        assert_eq!(gav.artifact_id, "maven-model");
        assert_eq!(gav.version, "2.2.1");
        assert_eq!(gav.classifier, None);
        assert_eq!(gav.extension, "jar");
        assert!(!gav.is_snapshot);
        assert_eq!(calc.gav_path(&gav), path);
    }

    #[test]
    fn release_with_classifier_round_trip() {
        let calc = Maven2GavCalculator::new();
        let path = "org/apache/maven/maven-model/2.2.1/maven-model-2.2.1-sources.jar";
        let gav = calc.path_to_gav(path).expect("parses");
        assert_eq!(gav.classifier.as_deref(), Some("sources"));
        assert_eq!(calc.gav_path(&gav), path);
    }

    #[test]
    fn snapshot_round_trip() {
        let calc = Maven2GavCalculator::new();
        let path = "com/example/widget/1.0-SNAPSHOT/widget-1.0-20230102.030405-7.jar";
        let gav = calc.path_to_gav(path).expect("parses");
        assert!(gav.is_snapshot);
        assert_eq!(gav.base_version, "1.0");
        assert_eq!(gav.version, "1.0-SNAPSHOT");
        assert_eq!(gav.snapshot_timestamp.as_deref(), Some("20230102.030405"));
        assert_eq!(gav.build_number, Some(7));
        assert_eq!(gav.classifier, None);
        assert_eq!(calc.gav_path(&gav), path);
    }

    #[test]
    fn snapshot_with_classifier_round_trip() {
        let calc = Maven2GavCalculator::new();
        let path = "com/example/widget/1.0-SNAPSHOT/widget-1.0-20230102.030405-7-sources.jar";
        let gav = calc.path_to_gav(path).expect("parses");
        assert_eq!(gav.classifier.as_deref(), Some("sources"));
        assert_eq!(calc.gav_path(&gav), path);
    }

    #[test]
    fn compound_extension_is_matched_longest_first() {
        let calc = Maven2GavCalculator::new();
        let path = "org/example/bundle/1.0/bundle-1.0.tar.gz";
        let gav = calc.path_to_gav(path).expect("parses");
        assert_eq!(gav.extension, "tar.gz");
        assert_eq!(gav.version, "1.0");
    }

    #[test]
    fn rejects_unrelated_artifact_prefix() {
        let calc = Maven2GavCalculator::new();
        let path = "org/example/bundle/1.0/other-1.0.jar";
        assert!(calc.path_to_gav(path).is_none());
    }

    #[test]
    fn rejects_too_shallow_path() {
        let calc = Maven2GavCalculator::new();
        assert!(calc.path_to_gav("bundle-1.0.jar").is_none());
    }
}
