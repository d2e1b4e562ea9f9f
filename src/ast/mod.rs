//! Minimal CSS abstract syntax tree.
//!
//! Nodes live in a [`CssTree`] arena and are addressed by [`NodeId`]. A tree
//! may hold several detached nodes; [`CssTree::append`] links them under a
//! container, and [`stringify`] renders any subtree to CSS text.

pub mod node;
pub mod render;
pub mod tree;

pub use node::{AtRule, Declaration, Node, NodeId, Rule};
pub use render::stringify;
pub use tree::{AstError, CssTree};
