//! Device descriptors and selections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Camera,
    Microphone,
}

impl DeviceKind {
    /// Short name used in logs and persistence keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Camera => "camera",
            DeviceKind::Microphone => "mic",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One enumerable input device. Snapshot of a single enumeration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Platform device id, unique per kind.
    pub id: String,
    pub kind: DeviceKind,
    /// Human-readable label.
    pub label: String,
}

impl DeviceDescriptor {
    pub fn new(id: impl Into<String>, kind: DeviceKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
        }
    }
}

/// Requested or effective camera/microphone pair.
///
/// An absent id means "let the platform choose a default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSelection {
    pub camera_id: Option<String>,
    pub mic_id: Option<String>,
}

impl DeviceSelection {
    /// Build a selection, treating empty strings as absent.
    pub fn new(camera_id: Option<String>, mic_id: Option<String>) -> Self {
        Self {
            camera_id: normalize_id(camera_id),
            mic_id: normalize_id(mic_id),
        }
    }

    /// Selection that lets the platform pick both devices.
    pub fn platform_default() -> Self {
        Self::default()
    }

    /// True when neither device is pinned.
    pub fn is_default(&self) -> bool {
        self.camera_id.is_none() && self.mic_id.is_none()
    }

    pub fn get(&self, kind: DeviceKind) -> Option<&str> {
        match kind {
            DeviceKind::Camera => self.camera_id.as_deref(),
            DeviceKind::Microphone => self.mic_id.as_deref(),
        }
    }

    /// Copy of this selection with one field replaced.
    pub fn with(&self, kind: DeviceKind, id: Option<String>) -> Self {
        let mut next = self.clone();
        match kind {
            DeviceKind::Camera => next.camera_id = normalize_id(id),
            DeviceKind::Microphone => next.mic_id = normalize_id(id),
        }
        next
    }
}

fn normalize_id(id: Option<String>) -> Option<String> {
    id.filter(|s| !s.is_empty())
}

/// Split an enumeration into cameras and microphones, preserving order.
pub fn partition_devices(
    devices: &[DeviceDescriptor],
) -> (Vec<DeviceDescriptor>, Vec<DeviceDescriptor>) {
    devices
        .iter()
        .cloned()
        .partition(|d| d.kind == DeviceKind::Camera)
}
