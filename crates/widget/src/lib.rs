//! Clipper widget.
//!
//! [`WidgetController`] wires the device picker and the record/stop control
//! pair to the capture engine, and publishes each finished clip as a
//! [`ClipValue`](clipper_clip_codec::ClipValue). [`ClipperBinding`] exposes
//! widgets to a host input system.

pub mod binding;
pub mod controller;
pub mod controls;
pub mod picker;

pub use binding::*;
pub use controller::*;
pub use controls::*;
pub use picker::*;
