//! Capture stream lifecycle.
//!
//! At most one stream is held at a time. Opening a new one always stops the
//! tracks of the previous stream first, so the hardware is never claimed
//! twice.

use std::rc::Rc;

use clipper_common::config::CaptureDefaults;
use clipper_common::error::ClipperResult;
use clipper_platform_core::{
    CaptureStream, DeviceSelection, MediaConstraints, MediaPlatform, PreviewSettings,
    PreviewSurface,
};

/// Result of a successful [`StreamManager::open`].
#[derive(Debug, Clone, PartialEq)]
pub struct StreamGrant {
    pub stream_id: String,
    /// Device ids the platform actually picked.
    pub effective: DeviceSelection,
}

/// Owns the live capture stream and the preview it feeds.
pub struct StreamManager {
    platform: Rc<dyn MediaPlatform>,
    preview: Box<dyn PreviewSurface>,
    defaults: CaptureDefaults,
    current: Option<Box<dyn CaptureStream>>,
    effective: Option<DeviceSelection>,
}

impl StreamManager {
    pub fn new(
        platform: Rc<dyn MediaPlatform>,
        preview: Box<dyn PreviewSurface>,
        defaults: CaptureDefaults,
    ) -> Self {
        Self {
            platform,
            preview,
            defaults,
            current: None,
            effective: None,
        }
    }

    /// Release any current stream, then acquire one for `selection` and
    /// show it in the preview.
    ///
    /// On failure no stream is held afterwards.
    pub async fn open(&mut self, selection: &DeviceSelection) -> ClipperResult<StreamGrant> {
        self.release();

        let constraints = MediaConstraints::for_selection(selection, &self.defaults);
        tracing::debug!(
            camera = selection.camera_id.as_deref().unwrap_or("default"),
            mic = selection.mic_id.as_deref().unwrap_or("default"),
            "Requesting capture access"
        );
        let stream = self.platform.request_access(&constraints).await?;

        let effective = stream.effective_selection();
        let aspect_ratio = stream.video_settings().and_then(|s| s.aspect_ratio);
        self.preview.attach(
            stream.id(),
            PreviewSettings {
                mirrored: self.defaults.mirror_preview,
                aspect_ratio,
            },
        );
        self.preview.play();

        let grant = StreamGrant {
            stream_id: stream.id().to_string(),
            effective: effective.clone(),
        };
        tracing::info!(
            stream = %grant.stream_id,
            camera = effective.camera_id.as_deref().unwrap_or("-"),
            mic = effective.mic_id.as_deref().unwrap_or("-"),
            "Capture stream opened"
        );

        self.current = Some(stream);
        self.effective = Some(effective);
        Ok(grant)
    }

    /// Stop every track of the current stream and clear the preview.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.current.take() {
            stream.stop_tracks();
            self.preview.detach();
            tracing::info!(stream = %stream.id(), "Capture stream released");
        }
        self.effective = None;
    }

    pub fn stream(&self) -> Option<&dyn CaptureStream> {
        self.current.as_deref()
    }

    /// Device ids in effect for the current stream.
    pub fn effective(&self) -> Option<&DeviceSelection> {
        self.effective.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.current.as_ref().is_some_and(|s| s.is_live())
    }
}

impl Drop for StreamManager {
    fn drop(&mut self) {
        self.release();
    }
}
