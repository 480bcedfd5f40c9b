//! UI Widgets - tree diagram and the pan/zoom viewport hosting it
//!
//! Widgets report user intent through `ActionQueue` events; the app
//! dispatches them via the EventBus.

pub mod actions;
pub mod tree;
pub mod viewport;
