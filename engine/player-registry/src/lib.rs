//! Player Registry - Immutable NBA player identity table
//!
//! Maps Sleeper player IDs to names, teams, positions, and injury status.
//! The registry is built once by the host process and then shared by reference;
//! nothing in it changes after construction.

pub mod registry;
pub mod types;

pub use registry::PlayerRegistry;
pub use types::{Player, PlayerLookupError, RawPlayer, RegistryError};
