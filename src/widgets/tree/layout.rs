//! Tree layout: TreeNode -> positioned boxes and connector segments.
//!
//! Each subtree is a flex column (box on top, children row below, centered).
//! The children row is a flex row with a fixed gap. Subtree widths are
//! whatever taffy resolves bottom-up from max-content sizing; nothing is
//! balanced or precomputed here.
//!
//! ```text
//!            ┌────────┐
//!            │  root  │
//!            └───┬────┘
//!                │ stem
//!     ┌──────────┴──────────┐  bar (only with 2+ children)
//!     │ drop                │ drop
//! ┌───┴────┐           ┌────┴───┐
//! │ child  │           │ child  │
//! └────────┘           └────────┘
//! ```
//!
//! Layout is independent of zoom/pan; it is computed once per tree and
//! painted through the viewport transform.

use anyhow::Result;
use eframe::egui;
use log::debug;
use taffy::prelude::*;

use crate::entities::TreeNode;

pub const BOX_WIDTH: f32 = 128.0;
pub const BOX_HEIGHT: f32 = 64.0;
pub const BOX_BORDER: f32 = 2.0;
pub const BOX_ROUNDING: f32 = 8.0;
/// Stem length below a parent box, also the children row top padding
pub const CONNECTOR_GAP: f32 = 32.0;
/// Horizontal bar distance below the parent box bottom
pub const BAR_OFFSET: f32 = 16.0;
pub const LINE_WIDTH: f32 = 2.0;
/// Horizontal space between adjacent sibling subtrees
pub const SIBLING_GAP: f32 = 64.0;
/// Padding around the whole diagram
pub const OUTER_PADDING: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Parent box bottom, straight down
    Stem,
    /// Horizontal join across all children of one parent
    Bar,
    /// Child box top, up to the bar level
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub kind: ConnectorKind,
    pub from: egui::Pos2,
    pub to: egui::Pos2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: String,
    pub label: String,
    pub rect: egui::Rect,
    pub depth: usize,
}

/// Positioned diagram in its own coordinate space (origin top-left).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramLayout {
    pub boxes: Vec<NodeBox>,
    pub connectors: Vec<Connector>,
    pub size: egui::Vec2,
}

impl DiagramLayout {
    pub fn content_center(&self) -> egui::Pos2 {
        (self.size * 0.5).to_pos2()
    }

    pub fn connectors_of(&self, kind: ConnectorKind) -> impl Iterator<Item = &Connector> {
        self.connectors.iter().filter(move |c| c.kind == kind)
    }

    pub fn bars(&self) -> impl Iterator<Item = &Connector> {
        self.connectors_of(ConnectorKind::Bar)
    }

    pub fn find_box(&self, id: &str) -> Option<&NodeBox> {
        self.boxes.iter().find(|b| b.id == id)
    }
}

/// Flex nodes created for one tree node.
struct FlexNode<'a> {
    node: &'a TreeNode,
    /// Column holding the box and the children row
    subtree: NodeId,
    card: NodeId,
    row: Option<NodeId>,
    children: Vec<FlexNode<'a>>,
}

fn card_style() -> Style {
    Style {
        size: Size {
            width: length(BOX_WIDTH),
            height: length(BOX_HEIGHT),
        },
        flex_shrink: 0.0,
        ..Style::DEFAULT
    }
}

fn row_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        align_items: Some(AlignItems::FlexStart),
        gap: Size {
            width: length(SIBLING_GAP),
            height: zero(),
        },
        padding: Rect {
            left: zero(),
            right: zero(),
            top: length(CONNECTOR_GAP),
            bottom: zero(),
        },
        flex_shrink: 0.0,
        ..Style::DEFAULT
    }
}

fn subtree_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        align_items: Some(AlignItems::Center),
        flex_shrink: 0.0,
        ..Style::DEFAULT
    }
}

fn outer_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        padding: Rect {
            left: length(OUTER_PADDING),
            right: length(OUTER_PADDING),
            top: length(OUTER_PADDING),
            bottom: length(OUTER_PADDING),
        },
        ..Style::DEFAULT
    }
}

fn build<'a>(taffy: &mut TaffyTree<()>, node: &'a TreeNode) -> Result<FlexNode<'a>> {
    let card = taffy.new_leaf(card_style())?;

    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        children.push(build(taffy, child)?);
    }

    let row = if children.is_empty() {
        None
    } else {
        let ids: Vec<NodeId> = children.iter().map(|c| c.subtree).collect();
        Some(taffy.new_with_children(row_style(), &ids)?)
    };

    let mut column = vec![card];
    column.extend(row);
    let subtree = taffy.new_with_children(subtree_style(), &column)?;

    Ok(FlexNode {
        node,
        subtree,
        card,
        row,
        children,
    })
}

fn offset(taffy: &TaffyTree<()>, id: NodeId, parent: egui::Pos2) -> Result<(egui::Pos2, egui::Vec2)> {
    let l = taffy.layout(id)?;
    Ok((
        parent + egui::vec2(l.location.x, l.location.y),
        egui::vec2(l.size.width, l.size.height),
    ))
}

impl FlexNode<'_> {
    /// Emit boxes and connectors for this subtree. `parent` is the absolute
    /// origin of the flex container holding it. Returns the box rect.
    fn collect(
        &self,
        taffy: &TaffyTree<()>,
        parent: egui::Pos2,
        depth: usize,
        out: &mut DiagramLayout,
    ) -> Result<egui::Rect> {
        let (origin, _) = offset(taffy, self.subtree, parent)?;
        let (card_min, card_size) = offset(taffy, self.card, origin)?;
        let card = egui::Rect::from_min_size(card_min, card_size);

        out.boxes.push(NodeBox {
            id: self.node.id.clone(),
            label: self.node.label.clone(),
            rect: card,
            depth,
        });

        let Some(row) = self.row else {
            return Ok(card);
        };
        let (row_min, row_size) = offset(taffy, row, origin)?;

        let stem_x = card.center().x;
        out.connectors.push(Connector {
            kind: ConnectorKind::Stem,
            from: egui::pos2(stem_x, card.bottom()),
            to: egui::pos2(stem_x, card.bottom() + CONNECTOR_GAP),
        });

        let bar_y = row_min.y + BAR_OFFSET;
        if self.children.len() > 1 {
            out.connectors.push(Connector {
                kind: ConnectorKind::Bar,
                from: egui::pos2(row_min.x, bar_y),
                to: egui::pos2(row_min.x + row_size.x, bar_y),
            });
        }

        for child in &self.children {
            let child_card = child.collect(taffy, row_min, depth + 1, out)?;
            let x = child_card.center().x;
            out.connectors.push(Connector {
                kind: ConnectorKind::Drop,
                from: egui::pos2(x, child_card.top()),
                to: egui::pos2(x, bar_y),
            });
        }

        Ok(card)
    }
}

/// Lay out the whole tree.
pub fn layout_tree(root: &TreeNode) -> Result<DiagramLayout> {
    let mut taffy: TaffyTree<()> = TaffyTree::new();
    let flex_root = build(&mut taffy, root)?;
    let outer = taffy.new_with_children(outer_style(), &[flex_root.subtree])?;
    taffy.compute_layout(outer, Size::MAX_CONTENT)?;

    let (_, size) = offset(&taffy, outer, egui::Pos2::ZERO)?;
    let mut out = DiagramLayout {
        size,
        ..DiagramLayout::default()
    };
    flex_root.collect(&taffy, egui::Pos2::ZERO, 0, &mut out)?;

    debug!(
        "Tree layout: {} boxes, {} connectors, {:.0}x{:.0}",
        out.boxes.len(),
        out.connectors.len(),
        size.x,
        size.y
    );
    Ok(out)
}
