//! Identity types for the QSCA runtime

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a running cognitive core instance.
///
/// Carried on every log line emitted by the core's cycles so that several
/// cores in one process can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoreId(Uuid);

impl CoreId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CoreId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core:{}", self.0)
    }
}

/// Identifier of a future projection (`future_0` .. `future_4`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectionId(String);

impl ProjectionId {
    pub fn from_index(index: usize) -> Self {
        Self(format!("future_{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot identifier derived from the creation time in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(i64);

impl SnapshotId {
    /// Derive an id from `now`, bumping past `previous` so ids stay unique
    /// when two snapshots land in the same millisecond.
    pub fn derive(now: DateTime<Utc>, previous: Option<SnapshotId>) -> Self {
        let millis = now.timestamp_millis();
        match previous {
            Some(SnapshotId(prev)) if millis <= prev => Self(prev + 1),
            _ => Self(millis),
        }
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Short display form (`ID-1234`) using the last four digits.
    pub fn short(&self) -> String {
        let digits = self.0.to_string();
        let tail = &digits[digits.len().saturating_sub(4)..];
        format!("ID-{}", tail)
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snapshot:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_ids_stay_unique_within_one_millisecond() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let first = SnapshotId::derive(now, None);
        let second = SnapshotId::derive(now, Some(first));
        assert_eq!(first.as_millis(), 1_700_000_000_123);
        assert_eq!(second.as_millis(), 1_700_000_000_124);
        assert_eq!(second.short(), "ID-0124");
    }

    #[test]
    fn projection_ids_follow_seed_order() {
        assert_eq!(ProjectionId::from_index(3).as_str(), "future_3");
    }
}
