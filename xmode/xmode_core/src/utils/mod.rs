//! Utility types.
//!
//! Configuration loading and log-level handling shared by the library crates
//! and the command-line front end.

pub mod config;
pub mod logging;

pub use config::{PrincipalName, XmodeConfig};
pub use logging::LogLevel;
