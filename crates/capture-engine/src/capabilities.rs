//! Capture capability probing and guidance.
//!
//! Clipper needs capture access plus at least one camera and one
//! microphone before the widget can record anything.

use clipper_common::config::CaptureDefaults;
use clipper_common::error::ClipperError;
use clipper_platform_core::{
    partition_devices, DeviceSelection, MediaConstraints, MediaPlatform,
};

/// A platform capability the widget depends on.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Probe the platform and report every capability.
///
/// Opens a default stream once to trigger the permission prompt, releasing
/// it immediately, then enumerates devices.
pub async fn check_capabilities(
    platform: &dyn MediaPlatform,
    defaults: &CaptureDefaults,
) -> Vec<Capability> {
    let mut capabilities = vec![check_capture_access(platform, defaults).await];

    match platform.enumerate_devices().await {
        Ok(devices) => {
            let withheld = devices.iter().any(|d| d.id.is_empty());
            let (cameras, mics) = partition_devices(&devices);
            capabilities.push(device_capability(
                "Camera",
                "Video input for the preview and recording",
                cameras.len(),
            ));
            capabilities.push(device_capability(
                "Microphone",
                "Audio input recorded alongside the camera",
                mics.len(),
            ));
            capabilities.push(Capability {
                name: "Device Labels".to_string(),
                description: "Device ids and labels exposed for the picker".to_string(),
                available: !withheld,
                required: false,
                fix_instructions: withheld.then(|| {
                    "Grant capture access so devices can be listed by name".to_string()
                }),
            });
        }
        Err(e) => {
            tracing::warn!(error = %e, "Device enumeration failed");
            capabilities.push(Capability {
                name: "Device Enumeration".to_string(),
                description: "List cameras and microphones".to_string(),
                available: false,
                required: true,
                fix_instructions: Some(e.to_string()),
            });
        }
    }

    capabilities
}

async fn check_capture_access(
    platform: &dyn MediaPlatform,
    defaults: &CaptureDefaults,
) -> Capability {
    let constraints = MediaConstraints::for_selection(&DeviceSelection::default(), defaults);
    let (available, fix_instructions) = match platform.request_access(&constraints).await {
        Ok(mut stream) => {
            stream.stop_tracks();
            (true, None)
        }
        Err(ClipperError::PermissionDenied { .. }) => (
            false,
            Some("Allow camera and microphone access in the platform privacy settings".to_string()),
        ),
        Err(e) => (
            false,
            Some(format!(
                "{e}. Close other applications using the camera and check it is connected"
            )),
        ),
    };

    Capability {
        name: "Capture Access".to_string(),
        description: "Permission to open the camera and microphone".to_string(),
        available,
        required: true,
        fix_instructions,
    }
}

fn device_capability(name: &str, description: &str, count: usize) -> Capability {
    Capability {
        name: format!("{name} Devices"),
        description: format!("{description} ({count} found)"),
        available: count > 0,
        required: true,
        fix_instructions: if count == 0 {
            Some(format!("Connect a {} and retry", name.to_lowercase()))
        } else {
            None
        },
    }
}

/// Whether every required capability is available.
pub fn all_required_available(capabilities: &[Capability]) -> bool {
    capabilities.iter().all(|c| c.available || !c.required)
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("Clipper Capture Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
