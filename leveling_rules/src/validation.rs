//! Input validation applied before values reach the player store.

use thiserror::Error;

/// Reasons a level or experience value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error("experience must be finite, got {0}")]
    NonFinite(f64),

    #[error("experience must not be negative, got {0}")]
    Negative(f64),

    #[error("level {level} is outside 0..={max_level}")]
    LevelOutOfRange { level: u32, max_level: u32 },
}

/// Accept an experience value only if it is finite and non-negative.
pub fn validate_experience(experience: f64) -> Result<f64, ValidationError> {
    if !experience.is_finite() {
        return Err(ValidationError::NonFinite(experience));
    }
    if experience < 0.0 {
        return Err(ValidationError::Negative(experience));
    }
    Ok(experience)
}

pub fn is_valid_experience(experience: f64) -> bool {
    validate_experience(experience).is_ok()
}

/// Accept a level only if it lies in `[0, max_level]`.
pub fn validate_level(level: u32, max_level: u32) -> Result<u32, ValidationError> {
    if level > max_level {
        return Err(ValidationError::LevelOutOfRange { level, max_level });
    }
    Ok(level)
}

pub fn is_valid_level(level: u32, max_level: u32) -> bool {
    level <= max_level
}
