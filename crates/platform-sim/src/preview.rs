//! Preview surface that records what it was asked to display.

use std::cell::RefCell;
use std::rc::Rc;

use clipper_platform_core::{PreviewSettings, PreviewSurface};

#[derive(Debug, Default)]
struct PreviewState {
    source: Option<String>,
    settings: Option<PreviewSettings>,
    playing: bool,
    attach_count: usize,
}

/// Headless [`PreviewSurface`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct SimPreview {
    state: Rc<RefCell<PreviewState>>,
}

impl SimPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the stream currently attached.
    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    pub fn settings(&self) -> Option<PreviewSettings> {
        self.state.borrow().settings.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Number of times a stream was attached.
    pub fn attach_count(&self) -> usize {
        self.state.borrow().attach_count
    }
}

impl PreviewSurface for SimPreview {
    fn attach(&mut self, stream_id: &str, settings: PreviewSettings) {
        let mut state = self.state.borrow_mut();
        state.source = Some(stream_id.to_string());
        state.settings = Some(settings);
        state.playing = false;
        state.attach_count += 1;
    }

    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = state.source.is_some();
    }

    fn detach(&mut self) {
        let mut state = self.state.borrow_mut();
        state.source = None;
        state.playing = false;
    }
}
