//! Base64 transport payloads.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use base64::Engine;
use clipper_common::error::{ClipperError, ClipperResult};

use crate::clip::Clip;

/// Default number of bytes fed to the encoder at a time.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Encode a clip's payload as standard padded base64.
pub fn to_transport_payload(clip: &Clip) -> String {
    encode_blocks(&clip.payload, DEFAULT_BLOCK_SIZE)
}

/// Encode `bytes` as base64, feeding the encoder `block_size` bytes at a
/// time. The encoder carries partial groups across blocks, so the output is
/// identical for every block size.
pub fn encode_blocks(bytes: &[u8], block_size: usize) -> String {
    let block_size = block_size.max(1);
    let mut writer = EncoderStringWriter::new(&STANDARD);
    for block in bytes.chunks(block_size) {
        writer
            .write_all(block)
            .expect("base64 encoding into a String cannot fail");
    }
    writer.into_inner()
}

/// Decode a transport payload back into bytes.
pub fn from_transport_payload(payload: &str) -> ClipperResult<Vec<u8>> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| ClipperError::transport(e.to_string()))
}
