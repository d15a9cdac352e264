//! Cubelytics Protocol - wire types for the player search stream
//!
//! Defines the typed events a search stream delivers, the resolved player
//! identity, and the per-source results the client aggregates.

pub mod constants;
pub mod error;
pub mod events;
pub mod identity;
pub mod source;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use identity::*;
pub use source::*;
