//! Verdict table
//!
//! Maps a status code reported by the API to the fixed text sent to the
//! user. The default table knows the three review states; deployments can
//! add or override codes.

use std::collections::BTreeMap;

pub const APPROVED: &str = "approved";
pub const REVIEWING: &str = "reviewing";
pub const REJECTED: &str = "rejected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictTable {
    verdicts: BTreeMap<String, String>,
}

impl VerdictTable {
    /// Creates an empty table with no recognized codes
    pub fn empty() -> Self {
        Self {
            verdicts: BTreeMap::new(),
        }
    }

    /// Adds or replaces the template for `code`
    pub fn with_verdict(mut self, code: impl Into<String>, text: impl Into<String>) -> Self {
        self.verdicts.insert(code.into(), text.into());
        self
    }

    /// Template text for `code`, if the code is recognized
    pub fn verdict(&self, code: &str) -> Option<&str> {
        self.verdicts.get(code).map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.verdicts.contains_key(code)
    }

    /// Recognized codes in sorted order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.verdicts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

impl Default for VerdictTable {
    fn default() -> Self {
        Self::empty()
            .with_verdict(
                APPROVED,
                "The work has been reviewed: the reviewer liked everything. Hooray!",
            )
            .with_verdict(REVIEWING, "The work has been taken for review.")
            .with_verdict(
                REJECTED,
                "The work has been reviewed: the reviewer has some remarks.",
            )
    }
}
