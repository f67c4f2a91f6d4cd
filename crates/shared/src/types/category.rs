//! Orphan categories and the key patterns that select them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum key length for the long-form generated key heuristic.
pub const LEGACY_KEY_MIN_LENGTH: usize = 50;

/// Heuristic label for an object that has no database record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OrphanCategory {
    /// Generated thumbnails and size variants.
    Thumbnails,
    /// Backup index manifests.
    BackupIndexes,
    /// Files under a photographer's session gallery.
    GalleryFiles,
    /// Older long-form generated keys.
    LegacyUuid,
    /// No rule matched.
    #[default]
    Unknown,
}

impl OrphanCategory {
    /// Every category, in rule-priority order.
    pub const ALL: [Self; 5] = [
        Self::Thumbnails,
        Self::BackupIndexes,
        Self::GalleryFiles,
        Self::LegacyUuid,
        Self::Unknown,
    ];

    /// Stable string form used in payloads and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumbnails => "thumbnails",
            Self::BackupIndexes => "backup_indexes",
            Self::GalleryFiles => "gallery_files",
            Self::LegacyUuid => "legacy_uuid",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OrphanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicate over a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyPattern {
    /// Key contains the literal substring.
    Contains {
        /// Substring to look for.
        needle: String,
    },
    /// Key starts with `prefix` and contains `segment` somewhere.
    PrefixWithSegment {
        /// Required leading prefix.
        prefix: String,
        /// Required path segment.
        segment: String,
    },
    /// Key contains a `/` and is longer than `min_length` bytes.
    NestedLongerThan {
        /// Exclusive length threshold.
        min_length: usize,
    },
}

impl KeyPattern {
    /// Shorthand for [`KeyPattern::Contains`].
    #[must_use]
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains {
            needle: needle.into(),
        }
    }

    /// Shorthand for [`KeyPattern::PrefixWithSegment`].
    #[must_use]
    pub fn prefix_with_segment(prefix: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::PrefixWithSegment {
            prefix: prefix.into(),
            segment: segment.into(),
        }
    }

    /// Whether the key satisfies this pattern.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Contains { needle } => key.contains(needle.as_str()),
            Self::PrefixWithSegment { prefix, segment } => {
                key.starts_with(prefix.as_str()) && key.contains(segment.as_str())
            }
            Self::NestedLongerThan { min_length } => key.contains('/') && key.len() > *min_length,
        }
    }
}

/// One entry in the ordered classification list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Label assigned when the rule matches.
    pub category: OrphanCategory,
    /// The rule matches when any pattern matches.
    pub any_of: Vec<KeyPattern>,
}

impl CategoryRule {
    /// Create a rule.
    #[must_use]
    pub fn new(category: OrphanCategory, any_of: Vec<KeyPattern>) -> Self {
        Self { category, any_of }
    }

    /// Whether any pattern of this rule matches the key.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.any_of.iter().any(|p| p.matches(key))
    }

    /// The built-in rule list, in priority order.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                OrphanCategory::Thumbnails,
                vec![
                    KeyPattern::contains("thumbnails/"),
                    KeyPattern::contains("_sm."),
                    KeyPattern::contains("_md."),
                    KeyPattern::contains("_lg."),
                ],
            ),
            Self::new(
                OrphanCategory::BackupIndexes,
                vec![KeyPattern::contains("backup_index.json")],
            ),
            Self::new(
                OrphanCategory::GalleryFiles,
                vec![KeyPattern::prefix_with_segment("photographers/", "/sessions/")],
            ),
            Self::new(
                OrphanCategory::LegacyUuid,
                vec![KeyPattern::NestedLongerThan {
                    min_length: LEGACY_KEY_MIN_LENGTH,
                }],
            ),
        ]
    }
}
