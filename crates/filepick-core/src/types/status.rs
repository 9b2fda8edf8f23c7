//! Index status of a node.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Where a node stands with respect to the knowledge-base index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexStatus {
    /// Content is indexed and searchable.
    Indexed,
    /// Submitted for indexing, not finished yet.
    Pending,
    /// Indexing failed or timed out.
    Error,
    /// Removed from the index.
    Deindexed,
    /// Evaluated and not part of the index.
    #[default]
    NotIndexed,
    /// Folder-only: never evaluated.
    NoStatus,
}

impl IndexStatus {
    /// All statuses, in display order.
    pub const ALL: [IndexStatus; 6] = [
        Self::Indexed,
        Self::Pending,
        Self::Error,
        Self::Deindexed,
        Self::NotIndexed,
        Self::NoStatus,
    ];

    /// Whether the indexing poll loop can stop waiting on this node.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Indexed | Self::Error)
    }

    /// Return the status as a kebab-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::Pending => "pending",
            Self::Error => "error",
            Self::Deindexed => "deindexed",
            Self::NotIndexed => "not-indexed",
            Self::NoStatus => "no-status",
        }
    }
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IndexStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown index status '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_status() {
        for status in IndexStatus::ALL {
            assert_eq!(status.as_str().parse::<IndexStatus>().unwrap(), status);
        }
        assert!("done".parse::<IndexStatus>().is_err());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&IndexStatus::NotIndexed).unwrap();
        assert_eq!(json, "\"not-indexed\"");
        let parsed: IndexStatus = serde_json::from_str("\"no-status\"").unwrap();
        assert_eq!(parsed, IndexStatus::NoStatus);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(IndexStatus::Indexed.is_terminal());
        assert!(IndexStatus::Error.is_terminal());
        assert!(!IndexStatus::Pending.is_terminal());
    }
}
