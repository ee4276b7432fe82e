//! Host input binding.
//!
//! The host discovers widgets in a scope, subscribes to them, and reads the
//! last value each one published. Values live in a map keyed by widget id
//! that exists only between subscribe and unsubscribe.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use clipper_clip_codec::ClipValue;

use crate::controller::{ListenerId, WidgetController};

/// Name the binding is registered under with the host.
pub const INPUT_TYPE: &str = "video-clipper";

/// An element visible to the host, identified by id and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostElement {
    pub id: String,
    pub tag: String,
}

/// A region of the host UI to search for widgets.
#[derive(Debug, Clone, Default)]
pub struct BindScope {
    elements: Vec<HostElement>,
}

impl BindScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, id: impl Into<String>, tag: impl Into<String>) -> Self {
        self.elements.push(HostElement {
            id: id.into(),
            tag: tag.into(),
        });
        self
    }

    pub fn elements(&self) -> &[HostElement] {
        &self.elements
    }
}

/// Binding between widgets and the host's input system.
#[derive(Debug, Default)]
pub struct ClipperBinding {
    values: Rc<RefCell<HashMap<String, ClipValue>>>,
    handlers: HashMap<String, ListenerId>,
}

impl ClipperBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of every clip widget in `scope`, in document order.
    pub fn find(&self, scope: &BindScope) -> Vec<String> {
        scope
            .elements()
            .iter()
            .filter(|e| e.tag == INPUT_TYPE)
            .map(|e| e.id.clone())
            .collect()
    }

    /// Last value published by a subscribed widget.
    pub fn get_value(&self, id: &str) -> Option<ClipValue> {
        self.values.borrow().get(id).cloned()
    }

    /// Record each value the widget publishes and notify the host.
    pub fn subscribe(
        &mut self,
        widget: &mut WidgetController,
        mut callback: impl FnMut(bool) + 'static,
    ) {
        if self.handlers.contains_key(widget.id()) {
            self.unsubscribe(widget);
        }

        let id = widget.id().to_string();
        let values = Rc::clone(&self.values);
        let key = id.clone();
        let handler = widget.add_value_listener(move |value| {
            values.borrow_mut().insert(key.clone(), value.clone());
            callback(true);
        });
        tracing::debug!(widget = %id, "Subscribed");
        self.handlers.insert(id, handler);
    }

    pub fn unsubscribe(&mut self, widget: &mut WidgetController) {
        let Some(handler) = self.handlers.remove(widget.id()) else {
            return;
        };
        widget.remove_value_listener(handler);
        self.values.borrow_mut().remove(widget.id());
        tracing::debug!(widget = %widget.id(), "Unsubscribed");
    }

    pub fn is_subscribed(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }
}
