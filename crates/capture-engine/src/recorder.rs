//! Recorder state machine.
//!
//! ```text
//!   Idle ──start──► Recording ──stop(emit)──► Idle (+ clip)
//!                       │
//!                       └──stop(discard)──► Idle
//! ```
//!
//! The fragment buffer belongs to exactly one session: it is cleared when a
//! session starts and handed off or dropped when it stops.

use std::rc::Rc;

use clipper_clip_codec::{encode, Clip};
use clipper_common::clock::SessionClock;
use clipper_common::error::{ClipperError, ClipperResult};
use clipper_platform_core::{
    CaptureStream, Fragment, MediaPlatform, RecorderEvent, RecordingHandle,
};

/// Recorder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
}

/// Drives the platform recorder for one session at a time.
pub struct Recorder {
    platform: Rc<dyn MediaPlatform>,
    state: RecorderState,
    chunks: Vec<Fragment>,
    handle: Option<RecordingHandle>,
    clock: Option<SessionClock>,
    last_error: Option<String>,
    /// The platform already delivered `Stopped` for this session.
    finalized: bool,
}

impl Recorder {
    pub fn new(platform: Rc<dyn MediaPlatform>) -> Self {
        Self {
            platform,
            state: RecorderState::Idle,
            chunks: Vec::new(),
            handle: None,
            clock: None,
            last_error: None,
            finalized: false,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Fragments buffered for the current session.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn buffered_bytes(&self) -> usize {
        self.chunks.iter().map(Fragment::len).sum()
    }

    /// Last error reported by the platform recorder during this session.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Seconds since the current session started.
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.clock.as_ref().map(SessionClock::elapsed_secs)
    }

    /// Begin a new session on `stream`.
    pub fn start(&mut self, stream: &dyn CaptureStream) -> ClipperResult<()> {
        if self.state != RecorderState::Idle {
            return Err(ClipperError::AlreadyRecording);
        }
        if !stream.is_live() {
            return Err(ClipperError::NoLiveStream);
        }

        self.chunks.clear();
        self.last_error = None;
        self.finalized = false;

        let handle = self.platform.start_recording(stream)?;
        self.handle = Some(handle);
        let clock = SessionClock::start();
        tracing::info!(
            stream = %stream.id(),
            started_at = %clock.epoch_wall(),
            "Recording started"
        );
        self.clock = Some(clock);
        self.state = RecorderState::Recording;

        self.pump();
        Ok(())
    }

    /// Apply every event the platform has queued so far. Returns how many
    /// were processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let Some(handle) = self.handle.as_mut() else {
                break;
            };
            let Ok(event) = handle.events.try_recv() else {
                break;
            };
            self.apply(event);
            processed += 1;
        }
        processed
    }

    /// End the session.
    ///
    /// Asks the platform to stop and waits until it has flushed its final
    /// fragment. With `emit` the buffered fragments are assembled into a
    /// clip; without it they are discarded. Either way the recorder is
    /// `Idle` afterwards with an empty buffer.
    pub async fn stop(&mut self, emit: bool) -> ClipperResult<Option<Clip>> {
        if self.state != RecorderState::Recording {
            return Err(ClipperError::NotRecording);
        }

        if let Some(mut handle) = self.handle.take() {
            if !self.finalized {
                handle.control.request_stop();
                loop {
                    match handle.events.recv().await {
                        Some(event) => {
                            if self.apply(event) {
                                break;
                            }
                        }
                        None => {
                            tracing::warn!("Recorder event channel closed before stop completed");
                            break;
                        }
                    }
                }
            }
        }

        let chunks = std::mem::take(&mut self.chunks);
        let elapsed = self.clock.take().map(|c| c.elapsed_secs()).unwrap_or_default();
        self.state = RecorderState::Idle;
        self.finalized = false;

        if !emit {
            tracing::info!(
                discarded = chunks.len(),
                duration_secs = elapsed,
                "Recording cancelled"
            );
            return Ok(None);
        }

        match encode(&chunks) {
            Ok(clip) => {
                tracing::info!(
                    chunks = chunks.len(),
                    bytes = clip.len(),
                    mime = %clip.mime_type,
                    duration_secs = elapsed,
                    "Recording stopped"
                );
                Ok(Some(clip))
            }
            Err(e) => {
                tracing::warn!(error = %e, duration_secs = elapsed, "Recording produced no clip");
                Err(e)
            }
        }
    }

    /// Returns `true` for the terminal `Stopped` event.
    fn apply(&mut self, event: RecorderEvent) -> bool {
        match event {
            RecorderEvent::Started => {
                tracing::debug!("Platform recorder running");
                false
            }
            RecorderEvent::ChunkAvailable(fragment) => {
                if self.state == RecorderState::Recording {
                    tracing::debug!(bytes = fragment.len(), mime = %fragment.mime_type, "Fragment");
                    self.chunks.push(fragment);
                } else {
                    tracing::warn!(bytes = fragment.len(), "Dropping fragment outside a session");
                }
                false
            }
            RecorderEvent::Error(message) => {
                tracing::error!(error = %message, "Recorder error");
                self.last_error = Some(message);
                false
            }
            RecorderEvent::Stopped => {
                self.finalized = true;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipper_common::config::CaptureDefaults;
    use clipper_platform_core::{DeviceSelection, MediaConstraints};
    use clipper_platform_sim::SimulatedPlatform;

    async fn open(platform: &SimulatedPlatform) -> Box<dyn CaptureStream> {
        platform
            .request_access(&MediaConstraints::for_selection(
                &DeviceSelection::default(),
                &CaptureDefaults::default(),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn full_session_yields_ordered_clip() {
        let platform = SimulatedPlatform::with_default_devices();
        let stream = open(&platform).await;
        let mut recorder = Recorder::new(Rc::new(platform.clone()));

        recorder.start(stream.as_ref()).unwrap();
        assert_eq!(recorder.state(), RecorderState::Recording);

        platform.emit_chunk(vec![1; 10]);
        platform.emit_chunk(vec![2; 20]);
        assert_eq!(recorder.pump(), 2);
        platform.set_final_chunk(Some(vec![3; 30]));

        let clip = recorder.stop(true).await.unwrap().unwrap();
        assert_eq!(clip.len(), 60);
        assert_eq!(clip.mime_type, "video/webm");
        assert_eq!(&clip.payload[..10], &[1; 10]);
        assert_eq!(&clip.payload[30..], &[3; 30]);
        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(recorder.chunk_count(), 0);
        assert!(!platform.is_recording());
    }

    #[tokio::test]
    async fn stop_waits_for_final_fragment() {
        let platform = SimulatedPlatform::with_default_devices();
        let stream = open(&platform).await;
        let mut recorder = Recorder::new(Rc::new(platform.clone()));

        recorder.start(stream.as_ref()).unwrap();
        platform.set_final_chunk(Some(vec![9; 5]));

        let clip = recorder.stop(true).await.unwrap().unwrap();
        assert_eq!(clip.payload, vec![9; 5]);
    }

    #[tokio::test]
    async fn cancel_discards_buffer() {
        let platform = SimulatedPlatform::with_default_devices();
        let stream = open(&platform).await;
        let mut recorder = Recorder::new(Rc::new(platform.clone()));

        recorder.start(stream.as_ref()).unwrap();
        platform.emit_chunk(vec![1; 64]);
        recorder.pump();
        assert_eq!(recorder.buffered_bytes(), 64);

        assert_eq!(recorder.stop(false).await.unwrap(), None);
        assert_eq!(recorder.chunk_count(), 0);
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn empty_session_is_an_error() {
        let platform = SimulatedPlatform::with_default_devices();
        let stream = open(&platform).await;
        let mut recorder = Recorder::new(Rc::new(platform.clone()));

        recorder.start(stream.as_ref()).unwrap();
        let err = recorder.stop(true).await.unwrap_err();
        assert!(matches!(err, ClipperError::EmptySession));
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn state_violations_are_rejected() {
        let platform = SimulatedPlatform::with_default_devices();
        let mut stream = open(&platform).await;
        let mut recorder = Recorder::new(Rc::new(platform.clone()));

        assert!(matches!(
            recorder.stop(true).await.unwrap_err(),
            ClipperError::NotRecording
        ));

        recorder.start(stream.as_ref()).unwrap();
        assert!(matches!(
            recorder.start(stream.as_ref()).unwrap_err(),
            ClipperError::AlreadyRecording
        ));
        recorder.stop(false).await.unwrap();

        stream.stop_tracks();
        assert!(matches!(
            recorder.start(stream.as_ref()).unwrap_err(),
            ClipperError::NoLiveStream
        ));
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn mid_session_error_keeps_recording() {
        let platform = SimulatedPlatform::with_default_devices();
        let stream = open(&platform).await;
        let mut recorder = Recorder::new(Rc::new(platform.clone()));

        recorder.start(stream.as_ref()).unwrap();
        platform.emit_chunk(vec![1; 4]);
        platform.emit_error("encoder hiccup");
        platform.emit_chunk(vec![2; 4]);
        recorder.pump();

        assert_eq!(recorder.state(), RecorderState::Recording);
        assert_eq!(recorder.last_error(), Some("encoder hiccup"));
        assert_eq!(recorder.chunk_count(), 2);

        let clip = recorder.stop(true).await.unwrap().unwrap();
        assert_eq!(clip.len(), 8);
    }

    #[tokio::test]
    async fn sessions_do_not_share_fragments() {
        let platform = SimulatedPlatform::with_default_devices();
        let stream = open(&platform).await;
        let mut recorder = Recorder::new(Rc::new(platform.clone()));

        recorder.chunks.push(Fragment::new("video/webm", vec![0; 99]));
        recorder.start(stream.as_ref()).unwrap();
        assert_eq!(recorder.chunk_count(), 0);

        platform.emit_chunk(vec![1; 3]);
        recorder.pump();
        recorder.stop(false).await.unwrap();

        recorder.start(stream.as_ref()).unwrap();
        platform.emit_chunk(vec![2; 7]);
        let clip = recorder.stop(true).await.unwrap().unwrap();
        assert_eq!(clip.payload, vec![2; 7]);
    }
}
