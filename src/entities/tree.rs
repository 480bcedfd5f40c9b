//! Tree model - immutable n-ary tree of labeled nodes.
//!
//! Built once at startup (either the built-in fixture or a JSON file passed on
//! the command line) and never mutated afterwards. Each node owns its children
//! directly, so cycles cannot be expressed.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Single node of the diagram.
///
/// `children` order is display order (left to right).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

/// Tree validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    EmptyId,
    DuplicateId(String),
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::EmptyId => write!(f, "Tree node has an empty id"),
            TreeError::DuplicateId(id) => write!(f, "Duplicate tree node id: {}", id),
        }
    }
}

impl std::error::Error for TreeError {}

impl TreeNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style child append (keeps fixture construction readable)
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn leaf(id: impl Into<String>) -> Self {
        Self::new(id, "")
    }

    /// Default data set: a root with two parents, each with two children,
    /// and one grandchild hanging under one child of each side.
    pub fn family_tree() -> Self {
        TreeNode::new("root", "Family Tree")
            .with_child(
                TreeNode::leaf("left-parent")
                    .with_child(TreeNode::leaf("left-child-1").with_child(TreeNode::leaf("grandchild-1")))
                    .with_child(TreeNode::leaf("left-child-2")),
            )
            .with_child(
                TreeNode::leaf("right-parent")
                    .with_child(TreeNode::leaf("right-child-1"))
                    .with_child(TreeNode::leaf("right-child-2").with_child(TreeNode::leaf("grandchild-2"))),
            )
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total node count including self
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::len).sum::<usize>()
    }

    /// Depth of the deepest node (root alone = 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Pre-order walk, parents before children, children left to right.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Check ids are non-empty and unique across the whole tree.
    pub fn validate(&self) -> std::result::Result<(), TreeError> {
        let mut seen = HashSet::new();
        let mut error = None;
        self.walk(&mut |node, _| {
            if error.is_some() {
                return;
            }
            if node.id.is_empty() {
                error = Some(TreeError::EmptyId);
            } else if !seen.insert(node.id.as_str()) {
                error = Some(TreeError::DuplicateId(node.id.clone()));
            }
        });
        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Parse and validate a tree from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tree: TreeNode = serde_json::from_str(json).context("Invalid tree JSON")?;
        tree.validate()?;
        debug!("Parsed tree: {} nodes, depth {}", tree.len(), tree.depth());
        Ok(tree)
    }

    /// Load and validate a tree from a JSON file.
    pub fn from_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree file: {}", path.display()))?;
        let tree = Self::from_json_str(&json)
            .with_context(|| format!("Failed to load tree from {}", path.display()))?;
        info!("Loaded tree '{}' from {}", tree.id, path.display());
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_tree_shape() {
        let tree = TreeNode::family_tree();
        assert_eq!(tree.label, "Family Tree");
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.children.len(), 2);
        assert!(tree.find("grandchild-2").is_some_and(TreeNode::is_leaf));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_walk_is_preorder_left_to_right() {
        let tree = TreeNode::family_tree();
        let mut ids = Vec::new();
        tree.walk(&mut |n, _| ids.push(n.id.as_str()));
        assert_eq!(
            ids,
            vec![
                "root",
                "left-parent",
                "left-child-1",
                "grandchild-1",
                "left-child-2",
                "right-parent",
                "right-child-1",
                "right-child-2",
                "grandchild-2",
            ]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let tree = TreeNode::new("a", "A")
            .with_child(TreeNode::leaf("b"))
            .with_child(TreeNode::leaf("c").with_child(TreeNode::leaf("b")));
        assert_eq!(tree.validate(), Err(TreeError::DuplicateId("b".to_string())));
    }

    #[test]
    fn test_empty_id_rejected() {
        let tree = TreeNode::new("a", "A").with_child(TreeNode::leaf(""));
        assert_eq!(tree.validate(), Err(TreeError::EmptyId));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "id": "root",
            "label": "Root",
            "children": [
                { "id": "x", "label": "X" },
                { "id": "y", "children": [ { "id": "z" } ] }
            ]
        }"#;
        let tree = TreeNode::from_json_str(json).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.find("y").unwrap().label, "");
        assert_eq!(tree.find("z").unwrap().children.len(), 0);
    }

    #[test]
    fn test_from_json_str_duplicate_fails() {
        let json = r#"{ "id": "r", "children": [ { "id": "r" } ] }"#;
        let err = TreeNode::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate tree node id: r"));
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("tree_diagram_test_{}.json", std::process::id()));
        let json = serde_json::to_string(&TreeNode::family_tree()).unwrap();
        std::fs::write(&path, json).unwrap();

        let tree = TreeNode::from_json(&path).unwrap();
        assert_eq!(tree, TreeNode::family_tree());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_json_missing_file() {
        let err = TreeNode::from_json(Path::new("/nonexistent/tree.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read tree file"));
    }
}
