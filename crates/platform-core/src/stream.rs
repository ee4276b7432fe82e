//! Capture stream contracts: constraints, track settings, and preview.

use clipper_common::config::{CaptureDefaults, FacingMode};
use serde::{Deserialize, Serialize};

use crate::device::DeviceSelection;

/// Constraints passed to `MediaPlatform::request_access`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub video: VideoConstraints,
    pub audio: AudioConstraints,
}

/// Camera constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConstraints {
    /// Requested camera, `None` for the platform default.
    pub device_id: Option<String>,
    pub facing_mode: FacingMode,
    /// Width / height.
    pub aspect_ratio: f64,
}

/// Microphone constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConstraints {
    /// Requested microphone, `None` for the platform default.
    pub device_id: Option<String>,
}

impl MediaConstraints {
    /// Build constraints for a selection using the configured camera defaults.
    pub fn for_selection(selection: &DeviceSelection, defaults: &CaptureDefaults) -> Self {
        Self {
            video: VideoConstraints {
                device_id: selection.camera_id.clone(),
                facing_mode: defaults.facing,
                aspect_ratio: defaults.aspect_ratio,
            },
            audio: AudioConstraints {
                device_id: selection.mic_id.clone(),
            },
        }
    }
}

/// Settings actually in effect for one granted track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSettings {
    pub device_id: String,
    pub aspect_ratio: Option<f64>,
    pub facing_mode: Option<FacingMode>,
}

/// Open handle to camera + microphone hardware.
pub trait CaptureStream {
    /// Platform stream id.
    fn id(&self) -> &str;

    /// Settings of the video track, if the stream has one.
    fn video_settings(&self) -> Option<TrackSettings>;

    /// Settings of the audio track, if the stream has one.
    fn audio_settings(&self) -> Option<TrackSettings>;

    /// Whether any track still holds its device.
    fn is_live(&self) -> bool;

    /// Stop every track and release the hardware. Idempotent.
    fn stop_tracks(&mut self);
}

impl dyn CaptureStream + '_ {
    /// Device ids in effect for this stream.
    pub fn effective_selection(&self) -> DeviceSelection {
        DeviceSelection::new(
            self.video_settings().map(|s| s.device_id),
            self.audio_settings().map(|s| s.device_id),
        )
    }
}

/// Presentation hints for the preview surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSettings {
    /// Show the camera mirrored (selfie view).
    pub mirrored: bool,
    /// Aspect ratio of the granted video track, used to keep the preview
    /// from changing height when cameras are switched.
    pub aspect_ratio: Option<f64>,
}

/// Where the live stream is shown. Rendering itself is out of scope.
pub trait PreviewSurface {
    /// Use the given stream as the preview source.
    fn attach(&mut self, stream_id: &str, settings: PreviewSettings);

    /// Start playback of the attached source.
    fn play(&mut self);

    /// Drop the current source.
    fn detach(&mut self);
}
