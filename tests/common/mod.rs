//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::cell::RefCell;
use std::rc::Rc;

/// Records what each simulated input event changed.
///
/// The harness compares controller snapshots before and after every event and
/// appends to the matching field.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// Messages surfaced to the user, in order
    pub messages: Rc<RefCell<Vec<String>>>,
    /// Count of events that changed the selection
    pub selection_changed: Rc<RefCell<usize>>,
    /// Count of events that changed the graph
    pub graph_changed: Rc<RefCell<usize>>,
    /// (zoom, pan_x, pan_y) after each viewport change
    pub update_viewport: Rc<RefCell<Vec<(f32, f32, f32)>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
        *self.selection_changed.borrow_mut() = 0;
        *self.graph_changed.borrow_mut() = 0;
        self.update_viewport.borrow_mut().clear();
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}
