//! Recorder contracts: fragments, events, and the recording handle.

use tokio::sync::mpsc;

/// One buffered slice of encoded recording data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Container/codec type reported by the platform, e.g. `video/webm`.
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Fragment {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Callbacks raised by the platform recorder, delivered in capture order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// Platform capture has begun.
    Started,
    /// A buffered fragment was flushed.
    ChunkAvailable(Fragment),
    /// Platform capture fault. The session stays open.
    Error(String),
    /// Finalization after a stop request has completed. No further events follow.
    Stopped,
}

/// Control side of a platform recorder.
pub trait RecorderControl {
    /// Ask the platform to flush remaining data and finalize. Completion is
    /// signalled later by `RecorderEvent::Stopped`.
    fn request_stop(&mut self);
}

/// A running platform recording: the control handle plus its event queue.
pub struct RecordingHandle {
    pub control: Box<dyn RecorderControl>,
    pub events: mpsc::UnboundedReceiver<RecorderEvent>,
}

impl RecordingHandle {
    pub fn new(
        control: Box<dyn RecorderControl>,
        events: mpsc::UnboundedReceiver<RecorderEvent>,
    ) -> Self {
        Self { control, events }
    }
}

impl std::fmt::Debug for RecordingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingHandle").finish_non_exhaustive()
    }
}
