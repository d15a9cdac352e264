//! Cubelytics Console - terminal front end for the player search stream.
//!
//! Runs either as an interactive TUI or as a one-shot command printing the
//! assembled result cards as text or JSON.

pub mod config;
pub mod console;
pub mod layout;
pub mod logging;
pub mod oneshot;
pub mod output;

pub use config::Config;
