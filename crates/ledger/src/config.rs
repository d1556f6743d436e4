use serde::{Deserialize, Serialize};

/// Tuning knobs for the ledger engine, injected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Maximum animals assignable to one nest.
    pub nest_capacity: u32,
    /// Optimistic commit attempts before contention is reported as a system
    /// failure.
    pub max_commit_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            nest_capacity: 6,
            max_commit_retries: 16,
        }
    }
}
