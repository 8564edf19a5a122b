//! # Leveling Rules
//!
//! The rules crate of the progression system - player records, the experience
//! curve, configuration and the award formulas. Everything here is either a
//! plain value or a pure function; the only shared state is the configuration
//! handle.

pub mod config;
pub mod curve;
pub mod entities;
pub mod mechanics;
pub mod validation;

pub use config::{ConfigError, LevelingConfig, SharedConfig, MAX_LEVEL_LIMIT};
pub use curve::*;
pub use entities::*;
pub use mechanics::*;
pub use validation::*;
