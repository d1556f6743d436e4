//! Optimistic concurrency expectation for a versioned row.
//!
//! Inventory lines and debt accounts carry a monotonically increasing
//! version. An operation snapshots the rows it touches, validates against the
//! snapshot, and commits only if every row is still at the version it read;
//! otherwise the whole operation revalidates from scratch.

/// Expected state of a versioned row at commit time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// The row must not exist yet (first stock arrival, first charge).
    Absent,
    /// The row must still be at this exact version.
    Exact(u64),
}

impl ExpectedVersion {
    /// Check the expectation against the row's current version, if any.
    pub fn matches(self, actual: Option<u64>) -> bool {
        match (self, actual) {
            (ExpectedVersion::Absent, None) => true,
            (ExpectedVersion::Exact(expected), Some(found)) => expected == found,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_matches_only_missing_rows() {
        assert!(ExpectedVersion::Absent.matches(None));
        assert!(!ExpectedVersion::Absent.matches(Some(1)));
    }

    #[test]
    fn exact_matches_only_the_read_version() {
        assert!(ExpectedVersion::Exact(3).matches(Some(3)));
        assert!(!ExpectedVersion::Exact(3).matches(Some(4)));
        assert!(!ExpectedVersion::Exact(3).matches(None));
    }
}
