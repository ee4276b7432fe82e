//! Mime type helpers.

/// Strip parameters such as `;codecs=vp8,opus` and normalise case.
pub fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// File extension to use when writing a clip of this type to disk.
pub fn file_extension(mime_type: &str) -> &'static str {
    match essence(mime_type).as_str() {
        "video/webm" => "webm",
        "video/mp4" => "mp4",
        "video/x-matroska" => "mkv",
        "video/quicktime" => "mov",
        "audio/webm" => "weba",
        "audio/ogg" => "ogg",
        "audio/mp4" => "m4a",
        _ => "bin",
    }
}
