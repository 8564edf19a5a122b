//! Player identifiers and per-player progression records.

mod record;

pub use record::*;

use serde::{Deserialize, Serialize};

/// Stable identifier of a player (the platform account id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a player ID from its raw account number.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw account number.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PlayerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
