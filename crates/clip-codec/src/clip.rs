//! Clip assembly.

use clipper_common::error::{ClipperError, ClipperResult};
use clipper_platform_core::Fragment;

/// The assembled result of one completed recording session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub mime_type: String,
    pub payload: Vec<u8>,
}

impl Clip {
    pub fn new(mime_type: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload,
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Concatenate fragments in arrival order. The clip takes the mime type of
/// the first fragment; a session with no fragments has no type and is
/// rejected with `EmptySession`.
pub fn encode(chunks: &[Fragment]) -> ClipperResult<Clip> {
    let first = chunks.first().ok_or(ClipperError::EmptySession)?;

    if let Some(odd) = chunks.iter().find(|c| c.mime_type != first.mime_type) {
        tracing::warn!(
            expected = %first.mime_type,
            found = %odd.mime_type,
            "Fragment type differs within one session"
        );
    }

    let total = chunks.iter().map(Fragment::len).sum();
    let mut payload = Vec::with_capacity(total);
    for chunk in chunks {
        payload.extend_from_slice(&chunk.data);
    }

    Ok(Clip::new(first.mime_type.clone(), payload))
}
