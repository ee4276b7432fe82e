//! Device picker state.

use clipper_platform_core::{partition_devices, DeviceDescriptor, DeviceKind, DeviceSelection};

/// A user pick that changed the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceChange {
    pub kind: DeviceKind,
    pub device_id: String,
}

/// Camera and microphone menus with their active entries.
#[derive(Debug, Clone, Default)]
pub struct DevicePicker {
    cameras: Vec<DeviceDescriptor>,
    mics: Vec<DeviceDescriptor>,
    selection: DeviceSelection,
}

impl DevicePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both menus from an enumeration.
    pub fn set_devices(&mut self, devices: &[DeviceDescriptor]) {
        let (cameras, mics) = partition_devices(devices);
        self.cameras = cameras;
        self.mics = mics;
    }

    pub fn cameras(&self) -> &[DeviceDescriptor] {
        &self.cameras
    }

    pub fn mics(&self) -> &[DeviceDescriptor] {
        &self.mics
    }

    pub fn devices(&self, kind: DeviceKind) -> &[DeviceDescriptor] {
        match kind {
            DeviceKind::Camera => &self.cameras,
            DeviceKind::Microphone => &self.mics,
        }
    }

    pub fn selection(&self) -> &DeviceSelection {
        &self.selection
    }

    pub fn selected(&self, kind: DeviceKind) -> Option<&str> {
        self.selection.get(kind)
    }

    /// Mark entries active. `None` leaves that menu as it is.
    pub fn set_selected(&mut self, camera: Option<&str>, mic: Option<&str>) {
        if let Some(id) = camera {
            self.selection = self.selection.with(DeviceKind::Camera, Some(id.to_string()));
        }
        if let Some(id) = mic {
            self.selection = self.selection.with(DeviceKind::Microphone, Some(id.to_string()));
        }
    }

    /// Replace both active entries, including unsetting them.
    pub fn set_selection(&mut self, selection: DeviceSelection) {
        self.selection = selection;
    }

    /// A click on a menu entry. Reports a change only for a listed id.
    pub fn choose(&mut self, kind: DeviceKind, id: Option<&str>) -> Option<DeviceChange> {
        let id = id.filter(|id| !id.is_empty())?;
        if !self.devices(kind).iter().any(|d| d.id == id) {
            tracing::warn!(device = %kind, id, "Ignoring pick of unlisted device");
            return None;
        }

        self.selection = self.selection.with(kind, Some(id.to_string()));
        Some(DeviceChange {
            kind,
            device_id: id.to_string(),
        })
    }
}
