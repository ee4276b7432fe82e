//! Record/stop control pair.

use std::fmt;

use clipper_common::error::{ClipperError, ClipperResult};

/// Which control is actionable. At most one is at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveControl {
    #[default]
    None,
    Record,
    Stop,
}

impl ActiveControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Record => "record",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ActiveControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingControls {
    active: ActiveControl,
}

impl RecordingControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ActiveControl {
        self.active
    }

    pub fn is_actionable(&self, control: ActiveControl) -> bool {
        control != ActiveControl::None && self.active == control
    }

    pub fn set_active(&mut self, control: ActiveControl) {
        if self.active != control {
            tracing::debug!(from = %self.active, to = %control, "Controls changed");
            self.active = control;
        }
    }

    /// Disable both controls.
    pub fn disable(&mut self) {
        self.set_active(ActiveControl::None);
    }

    /// Fail unless `control` is the actionable one.
    pub fn ensure_actionable(&self, control: ActiveControl) -> ClipperResult<()> {
        if self.is_actionable(control) {
            Ok(())
        } else {
            Err(ClipperError::ControlUnavailable {
                control: control.to_string(),
            })
        }
    }
}
