//! Record one clip through the widget.

use std::path::PathBuf;
use std::rc::Rc;

use clipper_common::config::{default_store_path, ClipperConfig};
use clipper_platform_core::DeviceKind;
use clipper_platform_sim::{JsonFileStore, SimPreview};
use clipper_widget::WidgetController;

use crate::PlatformArgs;

pub struct RecordOptions {
    pub platform: PlatformArgs,
    pub camera: Option<String>,
    pub mic: Option<String>,
    pub chunks: Vec<usize>,
    pub mime: String,
    pub store: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

pub async fn run(config: &ClipperConfig, opts: RecordOptions) -> anyhow::Result<()> {
    config.transport.validate()?;

    let platform = super::simulated_platform(&opts.platform);
    platform.set_mime_type(opts.mime.clone());

    let store_path = opts
        .store
        .or_else(|| config.storage.path.clone())
        .unwrap_or_else(default_store_path);
    let store = JsonFileStore::open(store_path.clone())?;
    tracing::debug!(path = %store_path.display(), "Device choice store");

    let mut widget = WidgetController::new(
        "clipper-cli",
        Rc::new(platform.clone()),
        Box::new(store),
        Box::new(SimPreview::new()),
        config,
    );
    widget.initialize().await?;

    for (kind, id) in [
        (DeviceKind::Camera, opts.camera.as_deref()),
        (DeviceKind::Microphone, opts.mic.as_deref()),
    ] {
        let Some(id) = id else { continue };
        if !widget.picker().devices(kind).iter().any(|d| d.id == id) {
            anyhow::bail!("Unknown {kind} '{id}' (see `clipper devices`)");
        }
        widget.select_device(kind, Some(id)).await?;
    }

    if let Some(effective) = widget.effective_selection() {
        eprintln!(
            "Recording from camera {} and microphone {}",
            effective.camera_id.as_deref().unwrap_or("-"),
            effective.mic_id.as_deref().unwrap_or("-")
        );
    }

    widget.record()?;
    let (last, rest) = match opts.chunks.split_last() {
        Some((last, rest)) => (Some(*last), rest),
        None => (None, &[][..]),
    };
    for (index, size) in rest.iter().enumerate() {
        platform.emit_chunk(fragment_bytes(index, *size));
        widget.pump();
    }
    platform.set_final_chunk(last.map(|size| fragment_bytes(rest.len(), size)));

    let Some(value) = widget.stop().await? else {
        anyhow::bail!("Recording produced no data");
    };

    let json = serde_json::to_string_pretty(&value)?;
    match opts.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!("Clip value written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Deterministic filler for one simulated fragment.
fn fragment_bytes(index: usize, size: usize) -> Vec<u8> {
    (0..size).map(|j| (index * 31 + j) as u8).collect()
}
