//! Clipper platform core contracts.
//!
//! This crate contains the data structures and traits that sit between the
//! widget logic and whatever provides camera/microphone access (a browser
//! media layer, a native backend, or the simulated platform used in tests).
//! No concrete backend lives here.

pub mod device;
pub mod recording;
pub mod store;
pub mod stream;

pub use device::*;
pub use recording::*;
pub use store::*;
pub use stream::*;

use async_trait::async_trait;
use clipper_common::error::ClipperResult;

/// Inbound capability boundary to the platform media layer.
///
/// Every call happens on the single UI task, so futures are not `Send`.
#[async_trait(?Send)]
pub trait MediaPlatform {
    /// Request camera+microphone access for the given constraints.
    ///
    /// Fails with `PermissionDenied` when the user declines and with
    /// `DeviceUnavailable` when the request cannot be satisfied.
    async fn request_access(
        &self,
        constraints: &MediaConstraints,
    ) -> ClipperResult<Box<dyn CaptureStream>>;

    /// Enumerate all capture devices. Labels and ids are only meaningful
    /// after access has been granted at least once.
    async fn enumerate_devices(&self) -> ClipperResult<Vec<DeviceDescriptor>>;

    /// Begin recording the given stream into chunks.
    fn start_recording(&self, stream: &dyn CaptureStream) -> ClipperResult<RecordingHandle>;
}
