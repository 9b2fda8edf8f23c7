//! Sorting types for the visible node list.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Flip the direction.
    pub fn reversed(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Field the visible list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Display name.
    #[default]
    Name,
    /// Last modified, falling back to created.
    Modified,
}

/// A sort specification consisting of a key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by.
    #[serde(default)]
    pub key: SortKey,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a new sort spec.
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Ascending sort on the given key.
    pub fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    /// Descending sort on the given key.
    pub fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}
