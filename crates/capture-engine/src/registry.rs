//! Device enumeration and the persisted device choice.

use std::rc::Rc;

use clipper_common::config::StorageConfig;
use clipper_common::error::ClipperResult;
use clipper_platform_core::{
    DeviceDescriptor, DeviceKind, DeviceSelection, KeyValueStore, MediaPlatform,
};

/// Tracks available devices and remembers the user's explicit choices.
pub struct DeviceRegistry {
    platform: Rc<dyn MediaPlatform>,
    store: Box<dyn KeyValueStore>,
    keys: StorageConfig,
    devices: Vec<DeviceDescriptor>,
}

impl DeviceRegistry {
    pub fn new(
        platform: Rc<dyn MediaPlatform>,
        store: Box<dyn KeyValueStore>,
        keys: StorageConfig,
    ) -> Self {
        Self {
            platform,
            store,
            keys,
            devices: Vec::new(),
        }
    }

    /// Query the platform for all devices and cache the snapshot.
    ///
    /// Call only after access has been granted once: until then platforms
    /// withhold ids, and such anonymous entries are dropped here.
    pub async fn enumerate(&mut self) -> ClipperResult<Vec<DeviceDescriptor>> {
        let all = self.platform.enumerate_devices().await?;
        let total = all.len();
        let devices: Vec<DeviceDescriptor> =
            all.into_iter().filter(|d| !d.id.is_empty()).collect();

        if devices.len() < total {
            tracing::warn!(
                withheld = total - devices.len(),
                "Device ids withheld by platform; was capture access granted?"
            );
        }
        tracing::debug!(
            cameras = devices.iter().filter(|d| d.kind == DeviceKind::Camera).count(),
            mics = devices.iter().filter(|d| d.kind == DeviceKind::Microphone).count(),
            "Enumerated devices"
        );

        self.devices = devices.clone();
        Ok(devices)
    }

    /// Snapshot from the last enumeration.
    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    pub fn devices_of(&self, kind: DeviceKind) -> Vec<DeviceDescriptor> {
        self.devices
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }

    /// Whether the last enumeration listed this device.
    pub fn contains(&self, kind: DeviceKind, id: &str) -> bool {
        self.devices.iter().any(|d| d.kind == kind && d.id == id)
    }

    /// Read the persisted selection. Unset, empty, or unreadable entries
    /// come back absent.
    pub fn load_selection(&self) -> DeviceSelection {
        DeviceSelection::new(
            self.load(DeviceKind::Camera),
            self.load(DeviceKind::Microphone),
        )
    }

    /// Persist one field of the selection, leaving the other untouched.
    /// Only call this for an explicit user choice.
    pub fn save_selection(&mut self, kind: DeviceKind, id: &str) -> ClipperResult<()> {
        let key = self.key(kind).to_string();
        self.store.set(&key, id)?;
        tracing::info!(device = %kind, id, "Saved device choice");
        Ok(())
    }

    fn load(&self, kind: DeviceKind) -> Option<String> {
        match self.store.get(self.key(kind)) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(device = %kind, error = %e, "Failed to read saved device");
                None
            }
        }
    }

    fn key(&self, kind: DeviceKind) -> &str {
        match kind {
            DeviceKind::Camera => &self.keys.camera_key,
            DeviceKind::Microphone => &self.keys.mic_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipper_common::config::CaptureDefaults;
    use clipper_platform_core::MediaConstraints;
    use clipper_platform_sim::{MemoryStore, SimulatedPlatform};

    fn registry(platform: &SimulatedPlatform, store: MemoryStore) -> DeviceRegistry {
        DeviceRegistry::new(
            Rc::new(platform.clone()),
            Box::new(store),
            StorageConfig::default(),
        )
    }

    #[test]
    fn empty_store_gives_default_selection() {
        let platform = SimulatedPlatform::with_default_devices();
        let reg = registry(&platform, MemoryStore::new());
        assert!(reg.load_selection().is_default());
    }

    #[test]
    fn empty_persisted_value_is_absent() {
        let platform = SimulatedPlatform::with_default_devices();
        let store =
            MemoryStore::with_values([("multimodal-camera", ""), ("multimodal-mic", "mic2")]);
        let sel = registry(&platform, store).load_selection();
        assert_eq!(sel.camera_id, None);
        assert_eq!(sel.mic_id.as_deref(), Some("mic2"));
    }

    #[test]
    fn saving_one_kind_keeps_the_other() {
        let platform = SimulatedPlatform::with_default_devices();
        let store = MemoryStore::with_values([("multimodal-mic", "mic1")]);
        let mut reg = registry(&platform, store);

        reg.save_selection(DeviceKind::Camera, "cam2").unwrap();
        let sel = reg.load_selection();
        assert_eq!(sel.camera_id.as_deref(), Some("cam2"));
        assert_eq!(sel.mic_id.as_deref(), Some("mic1"));
    }

    #[tokio::test]
    async fn enumeration_drops_withheld_entries() {
        let platform = SimulatedPlatform::with_device_counts(2, 1);
        let mut reg = registry(&platform, MemoryStore::new());

        assert!(reg.enumerate().await.unwrap().is_empty());

        let mut stream = platform
            .request_access(&MediaConstraints::for_selection(
                &DeviceSelection::default(),
                &CaptureDefaults::default(),
            ))
            .await
            .unwrap();
        stream.stop_tracks();

        let devices = reg.enumerate().await.unwrap();
        assert_eq!(devices.len(), 3);
        assert_eq!(reg.devices_of(DeviceKind::Camera).len(), 2);
        assert!(reg.contains(DeviceKind::Microphone, "mic1"));
        assert!(!reg.contains(DeviceKind::Camera, "mic1"));
    }
}
