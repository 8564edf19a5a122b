//! Level bands used for colors and titles.

use serde::{Deserialize, Serialize};

/// Fixed level ranges shown with their own color and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LevelBand {
    /// 0-9.
    Novice,
    /// 10-24.
    Apprentice,
    /// 25-49.
    Adventurer,
    /// 50-74.
    Expert,
    /// 75-89.
    Master,
    /// 90 and above.
    Legend,
}

impl LevelBand {
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=9 => LevelBand::Novice,
            10..=24 => LevelBand::Apprentice,
            25..=49 => LevelBand::Adventurer,
            50..=74 => LevelBand::Expert,
            75..=89 => LevelBand::Master,
            _ => LevelBand::Legend,
        }
    }

    /// Hex color code for rich-text markup.
    pub fn color(&self) -> &'static str {
        match self {
            LevelBand::Novice => "#CCCCCC",
            LevelBand::Apprentice => "#00FF00",
            LevelBand::Adventurer => "#0080FF",
            LevelBand::Expert => "#8000FF",
            LevelBand::Master => "#FF8000",
            LevelBand::Legend => "#FF0000",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LevelBand::Novice => "Novice",
            LevelBand::Apprentice => "Apprentice",
            LevelBand::Adventurer => "Adventurer",
            LevelBand::Expert => "Expert",
            LevelBand::Master => "Master",
            LevelBand::Legend => "Legend",
        }
    }
}

/// Title reserved for players at the maximum level.
pub const MAX_LEVEL_TITLE: &str = "Supreme";

pub fn level_color(level: u32) -> &'static str {
    LevelBand::for_level(level).color()
}

/// Band title, or [`MAX_LEVEL_TITLE`] at the cap.
pub fn level_title(level: u32, max_level: u32) -> &'static str {
    if level >= max_level {
        MAX_LEVEL_TITLE
    } else {
        LevelBand::for_level(level).title()
    }
}
