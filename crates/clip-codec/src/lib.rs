//! Clipper Clip Codec
//!
//! Turns the fragments of one recording session into a [`Clip`] and moves
//! clips across text-only channels:
//! - **Assembly:** concatenate fragments in arrival order
//! - **Transport:** base64 payloads built block by block, and the paired decoder
//! - **Host value:** the `{ type, bytes }` shape handed to the host input system

pub mod clip;
pub mod mime;
pub mod transport;
pub mod value;

pub use clip::*;
pub use mime::*;
pub use transport::*;
pub use value::*;
