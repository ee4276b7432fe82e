//! Host-facing input value.

use clipper_common::error::ClipperResult;
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::transport::{encode_blocks, from_transport_payload};

/// Value published to the host when a clip is recorded.
///
/// Serializes as `{ "type": <mime type>, "bytes": <base64> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipValue {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub bytes: String,
}

impl ClipValue {
    /// Encode a clip, feeding the base64 encoder `block_size` bytes at a time.
    pub fn from_clip(clip: &Clip, block_size: usize) -> Self {
        Self {
            mime_type: clip.mime_type.clone(),
            bytes: encode_blocks(&clip.payload, block_size),
        }
    }

    /// Decode back into a clip.
    pub fn decode(&self) -> ClipperResult<Clip> {
        Ok(Clip::new(
            self.mime_type.clone(),
            from_transport_payload(&self.bytes)?,
        ))
    }
}
