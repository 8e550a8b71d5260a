//! Scenario identifiers.

use std::fmt;

/// The index of a scenario in a batch.
///
/// Indices display zero-padded to four digits (`7` becomes `0007`), which is the form used in
/// scenario and result file names.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialOrd,
    Ord,
    PartialEq,
    Eq,
    Hash,
    derive_more::From,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ScenarioIndex(u32);

impl ScenarioIndex {
    /// Index 0.
    pub const ZERO: ScenarioIndex = Self::new(0);

    /// Creates a new index.
    pub const fn new(val: u32) -> Self {
        Self(val)
    }

    /// Returns the inner representation of the index.
    pub const fn inner(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ScenarioIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}
