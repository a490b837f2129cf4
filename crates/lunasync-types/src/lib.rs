//! Shared type definitions for lunasync.
//!
//! Types defined here are used by the conversion core, the command layer,
//! and any host that receives computed clock values.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for host-side identifiers
//! - [`enums`] -- Moon phases, command actions, and apply outcomes

pub mod enums;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{Action, ApplyKind, MoonPhase};
pub use ids::WorldName;
