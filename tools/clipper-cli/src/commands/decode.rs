//! Decode a clip value into a media file.

use std::io::Read;
use std::path::{Path, PathBuf};

use clipper_clip_codec::{file_extension, ClipValue};

pub fn run(value: PathBuf, output_dir: PathBuf) -> anyhow::Result<()> {
    let text = read_value(&value)?;
    let value: ClipValue = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Not a clip value: {e}"))?;
    let clip = value.decode()?;

    std::fs::create_dir_all(&output_dir)?;
    let name = format!(
        "clip-{}.{}",
        chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ"),
        file_extension(&clip.mime_type)
    );
    let path = output_dir.join(name);
    std::fs::write(&path, &clip.payload)?;

    println!("Decoded clip: {}", path.display());
    println!("  Type: {}", clip.mime_type);
    println!("  Size: {} bytes", clip.len());

    Ok(())
}

fn read_value(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))
}
