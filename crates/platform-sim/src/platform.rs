//! Simulated media platform.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use clipper_common::error::{ClipperError, ClipperResult};
use clipper_platform_core::{
    CaptureStream, DeviceDescriptor, DeviceKind, Fragment, MediaConstraints, MediaPlatform,
    RecorderControl, RecorderEvent, RecordingHandle, TrackSettings,
};
use tokio::sync::mpsc;

/// Capture permission as seen by the simulated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimPermission {
    /// Not decided yet; the next access request is accepted.
    #[default]
    Prompt,
    Granted,
    Denied,
}

#[derive(Debug)]
struct StreamRecord {
    id: String,
    live: bool,
}

#[derive(Debug)]
struct SimState {
    devices: Vec<DeviceDescriptor>,
    permission: SimPermission,
    streams: Vec<StreamRecord>,
    peak_live: usize,
    access_requests: Vec<MediaConstraints>,
    mime_type: String,
    final_chunk: Option<Vec<u8>>,
    recorder: Option<mpsc::UnboundedSender<RecorderEvent>>,
}

impl SimState {
    fn live_count(&self) -> usize {
        self.streams.iter().filter(|s| s.live).count()
    }

    fn resolve(
        &self,
        kind: DeviceKind,
        requested: Option<&str>,
    ) -> ClipperResult<&DeviceDescriptor> {
        let mut candidates = self.devices.iter().filter(|d| d.kind == kind);
        match requested {
            Some(id) => candidates
                .find(|d| d.id == id)
                .ok_or_else(|| ClipperError::device_unavailable(format!("{kind} {id} not found"))),
            None => candidates
                .next()
                .ok_or_else(|| ClipperError::device_unavailable(format!("no {kind} connected"))),
        }
    }
}

/// In-process platform with scripted devices and recorder.
///
/// Cloning yields another handle to the same state, so a test can keep one
/// handle to drive the recorder while the widget owns another.
#[derive(Debug, Clone)]
pub struct SimulatedPlatform {
    state: Rc<RefCell<SimState>>,
}

impl SimulatedPlatform {
    /// Platform exposing the given devices. The first device of each kind is
    /// the platform default.
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState {
                devices,
                permission: SimPermission::Prompt,
                streams: Vec::new(),
                peak_live: 0,
                access_requests: Vec::new(),
                mime_type: "video/webm".to_string(),
                final_chunk: None,
                recorder: None,
            })),
        }
    }

    /// One camera (`cam1`) and one microphone (`mic1`).
    pub fn with_default_devices() -> Self {
        Self::with_device_counts(1, 1)
    }

    /// `cameras` cameras named `cam1..` and `mics` microphones named `mic1..`.
    pub fn with_device_counts(cameras: usize, mics: usize) -> Self {
        let cams = (1..=cameras).map(|i| {
            DeviceDescriptor::new(format!("cam{i}"), DeviceKind::Camera, format!("Camera {i}"))
        });
        let microphones = (1..=mics).map(|i| {
            DeviceDescriptor::new(
                format!("mic{i}"),
                DeviceKind::Microphone,
                format!("Microphone {i}"),
            )
        });
        Self::new(cams.chain(microphones).collect())
    }

    pub fn set_permission(&self, permission: SimPermission) {
        self.state.borrow_mut().permission = permission;
    }

    pub fn permission(&self) -> SimPermission {
        self.state.borrow().permission
    }

    /// Mime type reported on recorded fragments.
    pub fn set_mime_type(&self, mime_type: impl Into<String>) {
        self.state.borrow_mut().mime_type = mime_type.into();
    }

    /// Data flushed as a last fragment when a recording is stopped.
    pub fn set_final_chunk(&self, data: Option<Vec<u8>>) {
        self.state.borrow_mut().final_chunk = data;
    }

    /// Simulate a device being unplugged.
    pub fn remove_device(&self, id: &str) {
        self.state.borrow_mut().devices.retain(|d| d.id != id);
    }

    /// Simulate a device being plugged in.
    pub fn add_device(&self, device: DeviceDescriptor) {
        self.state.borrow_mut().devices.push(device);
    }

    /// Deliver a recorded fragment to the active recorder. Returns false when
    /// nothing is recording.
    pub fn emit_chunk(&self, data: Vec<u8>) -> bool {
        let state = self.state.borrow();
        let fragment = Fragment::new(state.mime_type.clone(), data);
        Self::send(&state, RecorderEvent::ChunkAvailable(fragment))
    }

    /// Report a recorder fault. Returns false when nothing is recording.
    pub fn emit_error(&self, message: impl Into<String>) -> bool {
        let state = self.state.borrow();
        Self::send(&state, RecorderEvent::Error(message.into()))
    }

    fn send(state: &SimState, event: RecorderEvent) -> bool {
        state
            .recorder
            .as_ref()
            .map(|tx| tx.send(event).is_ok())
            .unwrap_or(false)
    }

    /// Streams currently holding hardware.
    pub fn live_streams(&self) -> usize {
        self.state.borrow().live_count()
    }

    /// Highest number of simultaneously live streams ever observed.
    pub fn peak_live_streams(&self) -> usize {
        self.state.borrow().peak_live
    }

    /// Total number of streams ever granted.
    pub fn streams_opened(&self) -> usize {
        self.state.borrow().streams.len()
    }

    /// Every constraint set passed to `request_access`, in order.
    pub fn access_requests(&self) -> Vec<MediaConstraints> {
        self.state.borrow().access_requests.clone()
    }

    /// Whether a platform recorder is running.
    pub fn is_recording(&self) -> bool {
        self.state.borrow().recorder.is_some()
    }
}

#[async_trait(?Send)]
impl MediaPlatform for SimulatedPlatform {
    async fn request_access(
        &self,
        constraints: &MediaConstraints,
    ) -> ClipperResult<Box<dyn CaptureStream>> {
        let mut state = self.state.borrow_mut();
        state.access_requests.push(constraints.clone());

        let permission = state.permission;
        match permission {
            SimPermission::Denied => {
                return Err(ClipperError::permission_denied(
                    "camera and microphone access was declined",
                ))
            }
            SimPermission::Prompt => state.permission = SimPermission::Granted,
            SimPermission::Granted => {}
        }

        let camera = state
            .resolve(DeviceKind::Camera, constraints.video.device_id.as_deref())?
            .id
            .clone();
        let mic = state
            .resolve(DeviceKind::Microphone, constraints.audio.device_id.as_deref())?
            .id
            .clone();

        if let Some(busy) = state.streams.iter().find(|s| s.live) {
            return Err(ClipperError::device_unavailable(format!(
                "camera is held by stream {}",
                busy.id
            )));
        }

        let index = state.streams.len();
        let id = format!("stream-{}", index + 1);
        state.streams.push(StreamRecord {
            id: id.clone(),
            live: true,
        });
        let live = state.live_count();
        state.peak_live = state.peak_live.max(live);

        tracing::debug!(stream = %id, camera = %camera, mic = %mic, "Simulated access granted");

        Ok(Box::new(SimStream {
            state: Rc::clone(&self.state),
            index,
            id,
            video: TrackSettings {
                device_id: camera,
                aspect_ratio: Some(constraints.video.aspect_ratio),
                facing_mode: Some(constraints.video.facing_mode),
            },
            audio: TrackSettings {
                device_id: mic,
                aspect_ratio: None,
                facing_mode: None,
            },
        }))
    }

    async fn enumerate_devices(&self) -> ClipperResult<Vec<DeviceDescriptor>> {
        let state = self.state.borrow();
        if state.permission == SimPermission::Granted {
            return Ok(state.devices.clone());
        }
        // Browsers withhold ids and labels until access has been granted.
        Ok(state
            .devices
            .iter()
            .map(|d| DeviceDescriptor::new("", d.kind, ""))
            .collect())
    }

    fn start_recording(&self, stream: &dyn CaptureStream) -> ClipperResult<RecordingHandle> {
        if !stream.is_live() {
            return Err(ClipperError::NoLiveStream);
        }
        let mut state = self.state.borrow_mut();
        if state.recorder.is_some() {
            return Err(ClipperError::AlreadyRecording);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(RecorderEvent::Started);
        state.recorder = Some(tx);

        Ok(RecordingHandle::new(
            Box::new(SimRecorderControl {
                state: Rc::clone(&self.state),
            }),
            rx,
        ))
    }
}

/// Stream handed out by [`SimulatedPlatform`].
pub struct SimStream {
    state: Rc<RefCell<SimState>>,
    index: usize,
    id: String,
    video: TrackSettings,
    audio: TrackSettings,
}

impl CaptureStream for SimStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn video_settings(&self) -> Option<TrackSettings> {
        Some(self.video.clone())
    }

    fn audio_settings(&self) -> Option<TrackSettings> {
        Some(self.audio.clone())
    }

    fn is_live(&self) -> bool {
        self.state.borrow().streams[self.index].live
    }

    fn stop_tracks(&mut self) {
        self.state.borrow_mut().streams[self.index].live = false;
    }
}

struct SimRecorderControl {
    state: Rc<RefCell<SimState>>,
}

impl RecorderControl for SimRecorderControl {
    fn request_stop(&mut self) {
        let mut state = self.state.borrow_mut();
        let Some(tx) = state.recorder.take() else {
            return;
        };
        if let Some(data) = state.final_chunk.clone() {
            let fragment = Fragment::new(state.mime_type.clone(), data);
            let _ = tx.send(RecorderEvent::ChunkAvailable(fragment));
        }
        let _ = tx.send(RecorderEvent::Stopped);
    }
}
