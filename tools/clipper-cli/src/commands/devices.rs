//! List capture devices.

use std::rc::Rc;

use clipper_capture_engine::DeviceRegistry;
use clipper_common::config::{CaptureDefaults, StorageConfig};
use clipper_platform_core::{DeviceKind, DeviceSelection, MediaConstraints, MediaPlatform};
use clipper_platform_sim::MemoryStore;

use crate::PlatformArgs;

pub async fn run(args: PlatformArgs) -> anyhow::Result<()> {
    let platform = super::simulated_platform(&args);

    // Ids and labels are only listed once access has been granted.
    let constraints =
        MediaConstraints::for_selection(&DeviceSelection::default(), &CaptureDefaults::default());
    match platform.request_access(&constraints).await {
        Ok(mut stream) => stream.stop_tracks(),
        Err(e) => println!("[WARN] Capture access: {e}"),
    }

    let mut registry = DeviceRegistry::new(
        Rc::new(platform),
        Box::new(MemoryStore::new()),
        StorageConfig::default(),
    );
    let devices = registry.enumerate().await?;

    for kind in [DeviceKind::Camera, DeviceKind::Microphone] {
        let listed = registry.devices_of(kind);
        println!("{} ({}):", kind_heading(kind), listed.len());
        if listed.is_empty() {
            println!("  (none)");
        }
        for dev in &listed {
            println!("  {:<10} {}", dev.id, dev.label);
        }
    }

    if devices.is_empty() {
        println!();
        println!("No devices listed. Was capture access granted?");
    }

    Ok(())
}

fn kind_heading(kind: DeviceKind) -> &'static str {
    match kind {
        DeviceKind::Camera => "Cameras",
        DeviceKind::Microphone => "Microphones",
    }
}
