//! # Leveling Core
//!
//! The stateful half of the progression system. It owns the player store,
//! turns kill and reward events into experience awards, and publishes
//! level notifications for UI and logging collaborators.
//!
//! ## Core Components
//!
//! - **store**: Sharded per-player records with lazy creation
//! - **processor**: Kill/reward processing and the administrative commands
//! - **events**: Experience-gained and level-changed notifications
//! - **presentation**: Read-only formatting (titles, colors, progress bars)
//!
//! ## Flow
//!
//! The host reports a kill through [`KillEventSink::on_entity_killed`]; the
//! processor reads the configuration and the killers' levels, computes each
//! award and writes it to the [`ExperienceStore`], which publishes the
//! resulting events on its [`EventBus`].

pub mod events;
pub mod presentation;
pub mod processor;
pub mod store;

pub use events::*;
pub use presentation::*;
pub use processor::*;
pub use store::*;
