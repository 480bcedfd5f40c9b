//! Pub/Sub event bus between widgets and the app.
//!
//! Widgets never touch app state directly: they push events (zoom buttons,
//! hotkeys) and the app drains them once per frame.
//!
//! - subscribe(): callbacks run synchronously inside emit(), FIFO per type
//! - emit(): invokes callbacks, then queues the event
//! - poll(): drains the queue for batch processing in `update()`

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use log::warn;

/// Maximum events in queue before oldest are evicted
const MAX_QUEUE_SIZE: usize = 256;

/// Marker trait for events. Blanket-implemented for every `Send + Sync + 'static` type.
pub trait Event: Any + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync + 'static> Event for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

type Callback = Arc<dyn Fn(&dyn Any) + Send + Sync>;
type Subscribers = Arc<RwLock<HashMap<TypeId, Vec<Callback>>>>;

pub type BoxedEvent = Box<dyn Event>;

/// Downcast a queued event to its concrete type.
///
/// Goes through `(**event).as_any()` so the call dispatches on the inner
/// `dyn Event`; calling `as_any` on the `Box` itself would hit the blanket
/// impl for `Box<dyn Event>` and never match.
pub fn downcast_event<E: Event>(event: &BoxedEvent) -> Option<&E> {
    (**event).as_any().downcast_ref::<E>()
}

#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Subscribers,
    queue: Arc<Mutex<Vec<BoxedEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events of type E. The callback runs inside emit().
    pub fn subscribe<E, F>(&self, callback: F)
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let wrapped: Callback = Arc::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    pub fn emit<E: Event>(&self, event: E) {
        self.emit_boxed(Box::new(event));
    }

    /// Emit an already boxed event (widget action queues hand these over).
    pub fn emit_boxed(&self, event: BoxedEvent) {
        // Type id of the inner event, not of the Box
        let type_id = (*event).as_any().type_id();
        if let Some(cbs) = self
            .subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&type_id)
        {
            for cb in cbs {
                cb((*event).as_any());
            }
        }

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() >= MAX_QUEUE_SIZE {
            let evict_count = queue.len() / 2;
            warn!(
                "EventBus queue full ({} events), evicting oldest {}",
                queue.len(),
                evict_count
            );
            queue.drain(0..evict_count);
        }
        queue.push(event);
    }

    /// Drain all events emitted since the last poll.
    pub fn poll(&self) -> Vec<BoxedEvent> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::viewport::viewport_events::{ResetViewportEvent, ZoomInEvent};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_queues_for_poll() {
        let bus = EventBus::new();
        bus.emit(ZoomInEvent);
        bus.emit(ResetViewportEvent);
        assert_eq!(bus.queue_len(), 2);

        let events = bus.poll();
        assert_eq!(events.len(), 2);
        assert!(downcast_event::<ZoomInEvent>(&events[0]).is_some());
        assert!(downcast_event::<ResetViewportEvent>(&events[1]).is_some());
        assert!(downcast_event::<ZoomInEvent>(&events[1]).is_none());

        // Queue is empty after poll
        assert_eq!(bus.poll().len(), 0);
    }

    #[test]
    fn test_subscribe_called_immediately() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        bus.subscribe::<ZoomInEvent, _>(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(ZoomInEvent);
        bus.emit_boxed(Box::new(ZoomInEvent));
        bus.emit(ResetViewportEvent);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(bus.poll().len(), 3);
    }

    #[test]
    fn test_queue_eviction() {
        let bus = EventBus::new();
        for _ in 0..MAX_QUEUE_SIZE + 10 {
            bus.emit(ZoomInEvent);
        }
        assert!(bus.queue_len() <= MAX_QUEUE_SIZE);
    }
}
