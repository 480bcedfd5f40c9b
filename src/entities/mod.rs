//! Data entities.

pub mod tree;

pub use tree::{TreeError, TreeNode};
