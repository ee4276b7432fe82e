//! Clipper Capture Engine
//!
//! The stateful core of the widget. Each component talks to the platform
//! only through the traits in `clipper-platform-core`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               WidgetController               │
//! └──────┬───────────────┬───────────────┬───────┘
//!        ▼               ▼               ▼
//! ┌────────────┐  ┌──────────────┐  ┌──────────┐
//! │  Device    │  │   Stream     │  │ Recorder │──► Clip
//! │  Registry  │  │   Manager    │──►│          │
//! └─────┬──────┘  └──────┬───────┘  └────┬─────┘
//!       │ store          │ preview       │ events
//!       ▼                ▼               ▼
//! ┌──────────────────────────────────────────────┐
//! │          MediaPlatform / KeyValueStore        │
//! └──────────────────────────────────────────────┘
//! ```

pub mod capabilities;
pub mod recorder;
pub mod registry;
pub mod stream;

pub use capabilities::*;
pub use recorder::*;
pub use registry::*;
pub use stream::*;
