//! Clipper Simulated Platform
//!
//! A headless implementation of the platform boundary:
//! - **Media:** scripted camera/microphone devices, permission prompts,
//!   exclusive camera locks, and a recorder fed by the caller
//! - **Preview:** a surface that remembers what it was asked to show
//! - **Storage:** in-memory and JSON-file key-value stores
//!
//! Used by the test suites and by the `clipper` CLI.

pub mod platform;
pub mod preview;
pub mod store;

pub use platform::*;
pub use preview::*;
pub use store::*;
