//! Tree diagram viewer library
//!
//! Re-exports all modules for use by the binary target.

// Core (event bus)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod entities;
pub mod help;
pub mod settings;
pub mod widgets;

pub use core::event_bus::{BoxedEvent, EventBus, downcast_event};
pub use entities::{TreeError, TreeNode};
pub use settings::AppSettings;
pub use widgets::tree::{DiagramLayout, layout_tree};
pub use widgets::viewport::{TreeViewport, ViewportController, ViewportState};
