//! Tree widget - recursive layout of the diagram and its painting
//!
//! Layout runs once per tree (taffy flexbox); painting runs every frame
//! through the viewport transform.

mod layout;
mod tree_ui;

pub use layout::{
    BAR_OFFSET, BOX_HEIGHT, BOX_WIDTH, CONNECTOR_GAP, Connector, ConnectorKind, DiagramLayout,
    NodeBox, SIBLING_GAP, layout_tree,
};
pub use tree_ui::{DiagramColors, DiagramTransform, paint_diagram};
