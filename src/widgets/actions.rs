//! Action queue for widgets that emit events.

use crate::core::event_bus::{BoxedEvent, Event};

/// Events a widget produced during one frame, for the app to dispatch.
#[derive(Default)]
pub struct ActionQueue {
    pub events: Vec<BoxedEvent>,
}

impl ActionQueue {
    pub fn send<E: Event>(&mut self, event: E) {
        self.events.push(Box::new(event));
    }
}
