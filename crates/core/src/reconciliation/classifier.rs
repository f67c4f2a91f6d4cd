//! Orphan classification by storage key shape.

use lumora_shared::types::{CategoryRule, OrphanCategory};

/// Ordered, first-match-wins rule list.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
}

impl Classifier {
    /// Create a classifier from rules in priority order.
    #[must_use]
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Category of the first rule matching `key`, or `Unknown`.
    #[must_use]
    pub fn classify(&self, key: &str) -> OrphanCategory {
        self.rules
            .iter()
            .find(|rule| rule.matches(key))
            .map_or(OrphanCategory::Unknown, |rule| rule.category)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(CategoryRule::defaults())
    }
}
