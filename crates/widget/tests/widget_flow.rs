use std::cell::RefCell;
use std::rc::Rc;

use clipper_capture_engine::RecorderState;
use clipper_clip_codec::from_transport_payload;
use clipper_common::config::ClipperConfig;
use clipper_common::error::ClipperError;
use clipper_platform_core::{DeviceDescriptor, DeviceKind, DeviceSelection};
use clipper_platform_sim::{MemoryStore, SimPermission, SimPreview, SimulatedPlatform};
use clipper_widget::{ActiveControl, BindScope, ClipperBinding, WidgetController, INPUT_TYPE};

struct Harness {
    platform: SimulatedPlatform,
    preview: SimPreview,
    widget: WidgetController,
}

fn harness(platform: SimulatedPlatform, store: MemoryStore) -> Harness {
    let preview = SimPreview::new();
    let widget = WidgetController::new(
        "clip-1",
        Rc::new(platform.clone()),
        Box::new(store),
        Box::new(preview.clone()),
        &ClipperConfig::default(),
    );
    Harness {
        platform,
        preview,
        widget,
    }
}

fn selection(camera: &str, mic: &str) -> DeviceSelection {
    DeviceSelection::new(Some(camera.to_string()), Some(mic.to_string()))
}

#[tokio::test]
async fn default_open_is_written_back_to_picker() {
    let mut h = harness(SimulatedPlatform::with_default_devices(), MemoryStore::new());
    h.widget.initialize().await.unwrap();

    assert_eq!(h.widget.picker().selection(), &selection("cam1", "mic1"));
    assert_eq!(h.widget.effective_selection(), Some(&selection("cam1", "mic1")));
    assert_eq!(h.widget.active_control(), ActiveControl::Record);
    assert_eq!(h.widget.picker().cameras().len(), 1);
    assert!(h.widget.saved_selection().is_default());
    assert!(h.preview.is_playing());
}

#[tokio::test]
async fn stale_saved_camera_falls_back_without_rewriting_store() {
    let store = MemoryStore::with_values([("multimodal-camera", "cam-old")]);
    let mut h = harness(SimulatedPlatform::with_default_devices(), store);
    h.widget.initialize().await.unwrap();

    let requests = h.platform.access_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].video.device_id.as_deref(), Some("cam-old"));
    assert_eq!(requests[1].video.device_id, None);

    assert_eq!(h.widget.picker().selected(DeviceKind::Camera), Some("cam1"));
    assert_eq!(h.widget.active_control(), ActiveControl::Record);
    assert_eq!(
        h.widget.saved_selection().camera_id.as_deref(),
        Some("cam-old")
    );
}

#[tokio::test]
async fn missing_saved_mic_keeps_saved_camera() {
    let store =
        MemoryStore::with_values([("multimodal-camera", "cam2"), ("multimodal-mic", "mic-old")]);
    let mut h = harness(SimulatedPlatform::with_device_counts(2, 1), store);
    h.widget.initialize().await.unwrap();

    let requests = h.platform.access_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].video.device_id.as_deref(), Some("cam2"));
    assert_eq!(requests[1].audio.device_id, None);

    assert_eq!(h.widget.picker().selection(), &selection("cam2", "mic1"));
    assert_eq!(h.widget.active_control(), ActiveControl::Record);
    assert_eq!(h.widget.saved_selection(), selection("cam2", "mic-old"));
}

#[tokio::test]
async fn three_chunk_session_publishes_sixty_bytes() {
    let mut h = harness(SimulatedPlatform::with_default_devices(), MemoryStore::new());
    h.widget.initialize().await.unwrap();

    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&published);
    h.widget
        .add_value_listener(move |value| sink.borrow_mut().push(value.clone()));

    h.widget.record().unwrap();
    h.platform.emit_chunk(vec![1; 10]);
    h.platform.emit_chunk(vec![2; 20]);
    h.widget.pump();
    h.platform.set_final_chunk(Some(vec![3; 30]));
    let value = h.widget.stop().await.unwrap().unwrap();

    assert_eq!(published.borrow().len(), 1);
    assert_eq!(published.borrow()[0], value);
    assert_eq!(value.mime_type, "video/webm");
    assert_eq!(from_transport_payload(&value.bytes).unwrap().len(), 60);
    assert_eq!(h.widget.recorder_state(), RecorderState::Idle);
    assert_eq!(h.widget.buffered_chunks(), 0);

    let json = serde_json::to_value(&value).unwrap();
    assert_eq!(json["type"], "video/webm");
}

#[tokio::test]
async fn cancel_publishes_nothing_and_clears_buffer() {
    let mut h = harness(SimulatedPlatform::with_default_devices(), MemoryStore::new());
    h.widget.initialize().await.unwrap();

    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    h.widget.add_value_listener(move |_| *counter.borrow_mut() += 1);

    h.widget.record().unwrap();
    h.platform.emit_chunk(vec![7; 100]);
    h.widget.pump();
    assert_eq!(h.widget.buffered_chunks(), 1);

    h.widget.cancel().await.unwrap();
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(h.widget.buffered_chunks(), 0);
    assert_eq!(h.widget.active_control(), ActiveControl::Record);
}

#[tokio::test]
async fn camera_switch_releases_old_stream_first() {
    let platform = SimulatedPlatform::with_device_counts(2, 1);
    let mut h = harness(platform, MemoryStore::new());
    h.widget.initialize().await.unwrap();
    let first = h.widget.stream_id().map(str::to_string);

    h.widget
        .select_device(DeviceKind::Camera, Some("cam2"))
        .await
        .unwrap();

    assert_eq!(h.platform.peak_live_streams(), 1);
    assert_eq!(h.platform.live_streams(), 1);
    assert_ne!(h.widget.stream_id().map(str::to_string), first);
    assert_eq!(h.preview.source().as_deref(), h.widget.stream_id());
    assert_eq!(
        h.widget.effective_selection().unwrap().camera_id.as_deref(),
        Some("cam2")
    );
    assert_eq!(h.widget.saved_selection().camera_id.as_deref(), Some("cam2"));
    assert_eq!(h.widget.saved_selection().mic_id, None);
}

#[tokio::test]
async fn switch_while_recording_is_rejected() {
    let platform = SimulatedPlatform::with_device_counts(2, 1);
    let mut h = harness(platform, MemoryStore::new());
    h.widget.initialize().await.unwrap();
    h.widget.record().unwrap();

    let err = h
        .widget
        .select_device(DeviceKind::Camera, Some("cam2"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipperError::SwitchWhileRecording { .. }));
    assert_eq!(h.widget.picker().selected(DeviceKind::Camera), Some("cam1"));
    assert!(h.widget.saved_selection().is_default());
    assert_eq!(h.platform.streams_opened(), 1);
    assert_eq!(h.widget.recorder_state(), RecorderState::Recording);
}

#[tokio::test]
async fn initialize_while_recording_is_rejected() {
    let mut h = harness(SimulatedPlatform::with_default_devices(), MemoryStore::new());
    h.widget.initialize().await.unwrap();
    h.widget.record().unwrap();
    h.platform.emit_chunk(vec![4; 16]);

    let err = h.widget.initialize().await.unwrap_err();
    assert!(matches!(err, ClipperError::AlreadyRecording));
    assert_eq!(h.platform.streams_opened(), 1);
    assert_eq!(h.widget.recorder_state(), RecorderState::Recording);
    assert_eq!(h.widget.active_control(), ActiveControl::Stop);

    let value = h.widget.stop().await.unwrap().unwrap();
    assert_eq!(from_transport_payload(&value.bytes).unwrap(), vec![4; 16]);
    assert_eq!(h.widget.active_control(), ActiveControl::Record);
}

#[tokio::test]
async fn picking_an_unplugged_device_degrades_to_default() {
    let platform = SimulatedPlatform::with_device_counts(2, 1);
    let mut h = harness(platform, MemoryStore::new());
    h.widget.initialize().await.unwrap();

    h.platform.remove_device("cam2");
    h.widget
        .select_device(DeviceKind::Camera, Some("cam2"))
        .await
        .unwrap();

    assert_eq!(h.widget.picker().selected(DeviceKind::Camera), Some("cam1"));
    assert_eq!(h.widget.picker().cameras().len(), 1);
    assert_eq!(h.widget.active_control(), ActiveControl::Record);
    assert_eq!(h.platform.live_streams(), 1);
}

#[tokio::test]
async fn failed_fallback_disables_controls() {
    let platform = SimulatedPlatform::with_device_counts(1, 2);
    let mut h = harness(platform, MemoryStore::new());
    h.widget.initialize().await.unwrap();

    h.platform.remove_device("cam1");
    let err = h
        .widget
        .select_device(DeviceKind::Microphone, Some("mic2"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipperError::DeviceUnavailable { .. }));
    assert_eq!(h.widget.active_control(), ActiveControl::None);
    assert_eq!(h.platform.live_streams(), 0);
    assert!(h.widget.stream_id().is_none());
    assert!(matches!(
        h.widget.record().unwrap_err(),
        ClipperError::ControlUnavailable { .. }
    ));
    assert_eq!(h.widget.picker().selection(), &selection("cam1", "mic1"));

    let err = h.widget.initialize().await.unwrap_err();
    assert!(matches!(err, ClipperError::DeviceUnavailable { .. }));
    assert_eq!(h.widget.active_control(), ActiveControl::None);
}

#[tokio::test]
async fn denied_reopen_restores_picker() {
    let platform = SimulatedPlatform::with_device_counts(2, 1);
    let mut h = harness(platform, MemoryStore::new());
    h.widget.initialize().await.unwrap();

    h.platform.set_permission(SimPermission::Denied);
    let err = h
        .widget
        .select_device(DeviceKind::Camera, Some("cam2"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClipperError::PermissionDenied { .. }));
    assert_eq!(h.widget.picker().selected(DeviceKind::Camera), Some("cam1"));
    assert_eq!(h.widget.active_control(), ActiveControl::None);
    assert_eq!(h.platform.live_streams(), 0);
}

#[tokio::test]
async fn hot_plugged_camera_is_listed_after_reinitialize() {
    let mut h = harness(SimulatedPlatform::with_default_devices(), MemoryStore::new());
    h.widget.initialize().await.unwrap();

    h.platform
        .add_device(DeviceDescriptor::new("cam2", DeviceKind::Camera, "USB Camera"));
    assert_eq!(h.widget.picker().cameras().len(), 1);

    h.widget.initialize().await.unwrap();
    assert_eq!(h.widget.picker().cameras().len(), 2);
    assert_eq!(h.widget.picker().selected(DeviceKind::Camera), Some("cam1"));
    assert_eq!(h.platform.peak_live_streams(), 1);
    assert_eq!(h.widget.active_control(), ActiveControl::Record);
}

#[tokio::test]
async fn denied_permission_disables_controls() {
    let platform = SimulatedPlatform::with_default_devices();
    platform.set_permission(SimPermission::Denied);
    let mut h = harness(platform, MemoryStore::new());

    let err = h.widget.initialize().await.unwrap_err();
    assert!(matches!(err, ClipperError::PermissionDenied { .. }));
    assert_eq!(h.widget.active_control(), ActiveControl::None);
    assert!(h.widget.record().is_err());
    assert!(h.widget.picker().cameras().is_empty());
}

#[tokio::test]
async fn no_fragment_leaks_into_next_session() {
    let mut h = harness(SimulatedPlatform::with_default_devices(), MemoryStore::new());
    h.widget.initialize().await.unwrap();

    h.widget.record().unwrap();
    h.platform.emit_chunk(vec![1; 50]);
    h.widget.pump();
    h.widget.cancel().await.unwrap();

    h.widget.record().unwrap();
    h.platform.emit_chunk(vec![2; 5]);
    let value = h.widget.stop().await.unwrap().unwrap();
    assert_eq!(from_transport_payload(&value.bytes).unwrap(), vec![2; 5]);
}

#[tokio::test]
async fn recorder_error_keeps_session_open() {
    let mut h = harness(SimulatedPlatform::with_default_devices(), MemoryStore::new());
    h.widget.initialize().await.unwrap();

    h.widget.record().unwrap();
    h.platform.emit_chunk(vec![1; 4]);
    h.platform.emit_error("device glitch");
    h.widget.pump();

    assert_eq!(h.widget.recorder_state(), RecorderState::Recording);
    assert_eq!(h.widget.active_control(), ActiveControl::Stop);
    assert!(matches!(
        h.widget.last_error(),
        Some(ClipperError::Recording { .. })
    ));

    let value = h.widget.stop().await.unwrap().unwrap();
    assert_eq!(from_transport_payload(&value.bytes).unwrap().len(), 4);
}

#[tokio::test]
async fn binding_tracks_last_value_per_widget() {
    let mut h = harness(SimulatedPlatform::with_default_devices(), MemoryStore::new());
    h.widget.initialize().await.unwrap();

    let scope = BindScope::new().with_element(h.widget.id(), INPUT_TYPE);
    let mut binding = ClipperBinding::new();
    assert_eq!(binding.find(&scope), [h.widget.id().to_string()]);

    let notified = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&notified);
    binding.subscribe(&mut h.widget, move |_| *counter.borrow_mut() += 1);
    assert_eq!(binding.get_value("clip-1"), None);

    h.widget.record().unwrap();
    h.platform.emit_chunk(vec![9; 12]);
    let value = h.widget.stop().await.unwrap().unwrap();

    assert_eq!(*notified.borrow(), 1);
    assert_eq!(binding.get_value("clip-1"), Some(value));

    binding.unsubscribe(&mut h.widget);
    assert!(!binding.is_subscribed("clip-1"));
    assert_eq!(binding.get_value("clip-1"), None);

    h.widget.record().unwrap();
    h.platform.emit_chunk(vec![9; 12]);
    h.widget.stop().await.unwrap();
    assert_eq!(*notified.borrow(), 1);
}

#[tokio::test]
async fn enumeration_lists_labels_after_access() {
    let platform = SimulatedPlatform::new(vec![
        DeviceDescriptor::new("front", DeviceKind::Camera, "Front Camera"),
        DeviceDescriptor::new("usb", DeviceKind::Camera, "USB Camera"),
        DeviceDescriptor::new("array", DeviceKind::Microphone, "Mic Array"),
    ]);
    let mut h = harness(platform, MemoryStore::with_values([("multimodal-camera", "usb")]));
    h.widget.initialize().await.unwrap();

    let labels: Vec<_> = h
        .widget
        .picker()
        .cameras()
        .iter()
        .map(|d| d.label.as_str())
        .collect();
    assert_eq!(labels, ["Front Camera", "USB Camera"]);
    assert_eq!(h.widget.picker().selected(DeviceKind::Camera), Some("usb"));
    assert_eq!(h.widget.picker().selected(DeviceKind::Microphone), Some("array"));
}
