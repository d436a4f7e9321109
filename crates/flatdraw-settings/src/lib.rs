//! FlatDraw Settings Crate
//!
//! Loads, validates and saves the drawing configuration. Configuration is
//! organized into sections:
//! - Workspace (bounds, tool radius, end-of-path tolerance)
//! - Motion (hover height, clearance, speeds, blending, dwell, home pose)
//! - Robot (address, script name, TCP, payload, reference frame)
//! - Execution (sink timeout and retry policy)

pub mod config;
pub mod error;

pub use config::{Config, ExecutionSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
