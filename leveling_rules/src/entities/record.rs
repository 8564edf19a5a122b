//! Player progression record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Level and experience state of a single player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub level: u32,

    /// Cumulative experience, never negative.
    pub experience: f64,

    /// Time of the last mutation.
    pub last_updated: DateTime<Utc>,
}

impl PlayerRecord {
    /// Create a fresh level-0 record.
    pub fn new() -> Self {
        Self::with_progress(0, 0.0)
    }

    /// Create a record at the given level and experience.
    pub fn with_progress(level: u32, experience: f64) -> Self {
        Self {
            level,
            experience,
            last_updated: Utc::now(),
        }
    }

    /// Overwrite level and experience, stamping the update time.
    pub fn update(&mut self, level: u32, experience: f64) {
        self.level = level;
        self.experience = experience;
        self.last_updated = Utc::now();
    }
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self::new()
    }
}
