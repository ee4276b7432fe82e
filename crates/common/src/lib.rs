//! Clipper Common Utilities
//!
//! Shared infrastructure for all Clipper crates:
//! - Error taxonomy and result alias
//! - Session clock used to time recordings
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
