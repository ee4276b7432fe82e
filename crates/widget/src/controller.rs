//! Widget orchestration.
//!
//! Startup order matters: the stream is opened before devices are
//! enumerated because that first open is what triggers the permission
//! prompt, and platforms withhold device ids until it is answered.

use std::rc::Rc;

use clipper_capture_engine::{DeviceRegistry, Recorder, RecorderState, StreamGrant, StreamManager};
use clipper_clip_codec::ClipValue;
use clipper_common::config::{ClipperConfig, TransportConfig};
use clipper_common::error::{ClipperError, ClipperResult};
use clipper_platform_core::{
    DeviceKind, DeviceSelection, KeyValueStore, MediaPlatform, PreviewSurface,
};

use crate::controls::{ActiveControl, RecordingControls};
use crate::picker::DevicePicker;

/// Handle returned by [`WidgetController::add_value_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ValueListener = Box<dyn FnMut(&ClipValue)>;

/// One widget instance.
pub struct WidgetController {
    id: String,
    registry: DeviceRegistry,
    streams: StreamManager,
    recorder: Recorder,
    picker: DevicePicker,
    controls: RecordingControls,
    transport: TransportConfig,
    listeners: Vec<(ListenerId, ValueListener)>,
    next_listener: u64,
}

impl WidgetController {
    pub fn new(
        id: impl Into<String>,
        platform: Rc<dyn MediaPlatform>,
        store: Box<dyn KeyValueStore>,
        preview: Box<dyn PreviewSurface>,
        config: &ClipperConfig,
    ) -> Self {
        Self {
            id: id.into(),
            registry: DeviceRegistry::new(Rc::clone(&platform), store, config.storage.clone()),
            streams: StreamManager::new(Rc::clone(&platform), preview, config.capture.clone()),
            recorder: Recorder::new(platform),
            picker: DevicePicker::new(),
            controls: RecordingControls::new(),
            transport: config.transport.clone(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Open the saved devices, fill the picker, and enable recording.
    ///
    /// A saved device that has gone away is replaced by the platform default
    /// while a still-listed saved device of the other kind is kept.
    /// A denied permission leaves both controls disabled. Rejected while a
    /// recording is in progress.
    pub async fn initialize(&mut self) -> ClipperResult<()> {
        if self.recorder.is_recording() {
            tracing::warn!(widget = %self.id, "Re-initialization rejected while recording");
            return Err(ClipperError::AlreadyRecording);
        }
        self.controls.disable();

        let saved = self.registry.load_selection();
        let grant = self.open_with_fallback(&saved).await?;

        match self.registry.enumerate().await {
            Ok(devices) => self.picker.set_devices(&devices),
            Err(e) => tracing::warn!(error = %e, "Device enumeration failed; picker left empty"),
        }
        self.sync_picker(&grant);

        tracing::info!(
            widget = %self.id,
            cameras = self.picker.cameras().len(),
            mics = self.picker.mics().len(),
            "Widget ready"
        );
        Ok(())
    }

    /// Handle a pick in the device menu.
    ///
    /// Picks of unlisted ids are ignored. A listed pick is saved and the
    /// stream reopened with the picker's selection. Rejected while a
    /// recording is in progress, leaving picker and saved choice unchanged.
    /// If no stream can be opened the picker goes back to its previous entries.
    pub async fn select_device(&mut self, kind: DeviceKind, id: Option<&str>) -> ClipperResult<()> {
        if self.recorder.is_recording() {
            tracing::warn!(
                device = %kind,
                id = id.unwrap_or("-"),
                "Device switch rejected while recording"
            );
            return Err(ClipperError::SwitchWhileRecording {
                device: kind.to_string(),
            });
        }

        let previous = self.picker.selection().clone();
        let Some(change) = self.picker.choose(kind, id) else {
            return Ok(());
        };
        if let Err(e) = self.registry.save_selection(change.kind, &change.device_id) {
            tracing::warn!(error = %e, "Failed to persist device choice");
        }

        let requested = self.picker.selection().clone();
        match self.open_with_fallback(&requested).await {
            Ok(grant) => {
                self.sync_picker(&grant);
                Ok(())
            }
            Err(e) => {
                self.picker.set_selection(previous);
                Err(e)
            }
        }
    }

    /// Record button.
    pub fn record(&mut self) -> ClipperResult<()> {
        self.controls.ensure_actionable(ActiveControl::Record)?;
        let stream = self.streams.stream().ok_or(ClipperError::NoLiveStream)?;
        self.recorder.start(stream)?;
        self.controls.set_active(ActiveControl::Stop);
        Ok(())
    }

    /// Stop button. Publishes the clip to every value listener and returns
    /// it. An empty session publishes nothing.
    pub async fn stop(&mut self) -> ClipperResult<Option<ClipValue>> {
        self.controls.ensure_actionable(ActiveControl::Stop)?;
        let result = self.recorder.stop(true).await;
        self.restore_controls();

        match result {
            Ok(Some(clip)) => {
                let value = ClipValue::from_clip(&clip, self.transport.block_size);
                self.emit(&value);
                Ok(Some(value))
            }
            Ok(None) | Err(ClipperError::EmptySession) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// End the session without publishing anything.
    pub async fn cancel(&mut self) -> ClipperResult<()> {
        self.controls.ensure_actionable(ActiveControl::Stop)?;
        let result = self.recorder.stop(false).await;
        self.restore_controls();
        result.map(|_| ())
    }

    /// Process recorder events queued by the platform.
    pub fn pump(&mut self) -> usize {
        self.recorder.pump()
    }

    pub fn add_value_listener(&mut self, listener: impl FnMut(&ClipValue) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the listener was not registered.
    pub fn remove_value_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn picker(&self) -> &DevicePicker {
        &self.picker
    }

    pub fn active_control(&self) -> ActiveControl {
        self.controls.active()
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.recorder.state()
    }

    /// Fragments buffered in the current session.
    pub fn buffered_chunks(&self) -> usize {
        self.recorder.chunk_count()
    }

    /// Last fault reported by the platform recorder in this session.
    pub fn last_error(&self) -> Option<ClipperError> {
        self.recorder.last_error().map(ClipperError::recording)
    }

    /// Device ids of the live stream.
    pub fn effective_selection(&self) -> Option<&DeviceSelection> {
        self.streams.effective()
    }

    pub fn stream_id(&self) -> Option<&str> {
        self.streams.stream().map(|s| s.id())
    }

    /// Choice persisted by the last explicit pick.
    pub fn saved_selection(&self) -> DeviceSelection {
        self.registry.load_selection()
    }

    async fn open_with_fallback(
        &mut self,
        requested: &DeviceSelection,
    ) -> ClipperResult<StreamGrant> {
        let first = self.streams.open(requested).await;
        let result = match first {
            Err(e) if e.is_recoverable() && !requested.is_default() => {
                let degraded = self.degrade(requested).await;
                tracing::warn!(
                    error = %e,
                    camera = degraded.camera_id.as_deref().unwrap_or("default"),
                    mic = degraded.mic_id.as_deref().unwrap_or("default"),
                    "Requested devices unavailable, retrying"
                );
                self.streams.open(&degraded).await
            }
            other => other,
        };

        match result {
            Ok(grant) => {
                self.controls.set_active(ActiveControl::Record);
                Ok(grant)
            }
            Err(e) => {
                tracing::error!(widget = %self.id, error = %e, "Failed to open capture stream");
                self.controls.disable();
                Err(e)
            }
        }
    }

    /// Drop the requested ids that a fresh enumeration no longer lists.
    /// Without a usable enumeration everything goes back to the defaults.
    async fn degrade(&mut self, requested: &DeviceSelection) -> DeviceSelection {
        match self.registry.enumerate().await {
            Ok(devices) => self.picker.set_devices(&devices),
            Err(e) => {
                tracing::warn!(error = %e, "Device enumeration failed during fallback");
                return DeviceSelection::platform_default();
            }
        }

        let mut degraded = requested.clone();
        for kind in [DeviceKind::Camera, DeviceKind::Microphone] {
            if let Some(id) = requested.get(kind) {
                if !self.registry.contains(kind, id) {
                    degraded = degraded.with(kind, None);
                }
            }
        }

        if degraded == *requested {
            DeviceSelection::platform_default()
        } else {
            degraded
        }
    }

    fn sync_picker(&mut self, grant: &StreamGrant) {
        self.picker.set_selected(
            grant.effective.camera_id.as_deref(),
            grant.effective.mic_id.as_deref(),
        );
    }

    fn restore_controls(&mut self) {
        if self.streams.is_live() {
            self.controls.set_active(ActiveControl::Record);
        } else {
            self.controls.disable();
        }
    }

    fn emit(&mut self, value: &ClipValue) {
        tracing::info!(
            widget = %self.id,
            mime = %value.mime_type,
            encoded_len = value.bytes.len(),
            listeners = self.listeners.len(),
            "Publishing clip value"
        );
        for (_, listener) in &mut self.listeners {
            listener(value);
        }
    }
}
