//! Tree operations: create, append, lookup, clear, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{AtRule, Declaration, Node, NodeId, Rule};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// Errors from AST mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AstError {
    #[error("node does not exist in this tree")]
    UnknownNode,
    #[error("declarations cannot hold children")]
    NotAContainer,
    #[error("node is already attached to a parent; detach it before appending elsewhere")]
    AlreadyAttached,
    #[error("the root node cannot be appended to another node")]
    CannotAppendRoot,
    #[error("appending this node would create a cycle")]
    Cycle,
}

/// The CSS AST, backed by a slotmap arena.
///
/// Nodes are created detached by the factory methods ([`CssTree::root`],
/// [`CssTree::rule`], [`CssTree::at_rule`], [`CssTree::decl`]) and linked with
/// [`CssTree::append`]. Parent back-references live in a secondary map and are
/// plain keys: they never own the parent.
#[derive(Debug, Clone)]
pub struct CssTree {
    nodes: SlotMap<NodeId, Node>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
}

impl CssTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
        }
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.children.insert(id, Vec::new());
        id
    }

    /// Create a new, empty root container.
    pub fn root(&mut self) -> NodeId {
        self.insert(Node::Root)
    }

    /// Create a detached rule.
    pub fn rule(&mut self, selector: impl Into<String>) -> NodeId {
        self.insert(Node::Rule(Rule::new(selector)))
    }

    /// Create a detached at-rule. `params` may be `None` (e.g. `@font-face`).
    pub fn at_rule(&mut self, name: impl Into<String>, params: Option<&str>) -> NodeId {
        let mut at_rule = AtRule::new(name);
        at_rule.params = params.map(str::to_string);
        self.insert(Node::AtRule(at_rule))
    }

    /// Create a detached declaration.
    pub fn decl(&mut self, declaration: Declaration) -> NodeId {
        self.insert(Node::Declaration(declaration))
    }

    /// Append `children` (in order) to `parent` and return `parent`.
    ///
    /// Every child is validated before anything is linked, so a rejected call
    /// leaves the tree untouched. A node can have at most one parent: appending
    /// an already attached node fails with [`AstError::AlreadyAttached`].
    pub fn append<I>(&mut self, parent: NodeId, children: I) -> Result<NodeId, AstError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let node = self.nodes.get(parent).ok_or(AstError::UnknownNode)?;
        if !node.is_container() {
            return Err(AstError::NotAContainer);
        }

        let children: Vec<NodeId> = children.into_iter().collect();
        let lineage = self.ancestors(parent);
        for (i, &child) in children.iter().enumerate() {
            let node = self.nodes.get(child).ok_or(AstError::UnknownNode)?;
            if matches!(node, Node::Root) {
                return Err(AstError::CannotAppendRoot);
            }
            if child == parent || lineage.contains(&child) {
                return Err(AstError::Cycle);
            }
            if self.parent.contains_key(child) || children[..i].contains(&child) {
                return Err(AstError::AlreadyAttached);
            }
        }

        for child in children {
            self.parent.insert(child, parent);
            if let Some(kids) = self.children.get_mut(parent) {
                kids.push(child);
            }
        }
        Ok(parent)
    }

    /// Remove every descendant of `id`, keeping `id` itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let kids = match self.children.get_mut(id) {
            Some(kids) => std::mem::take(kids),
            None => return,
        };

        // Collect all descendants (BFS) to remove them.
        let mut to_remove: VecDeque<NodeId> = kids.into();
        while let Some(current) = to_remove.pop_front() {
            if let Some(grandkids) = self.children.remove(current) {
                to_remove.extend(grandkids);
            }
            self.parent.remove(current);
            self.nodes.remove(current);
        }
    }

    /// Remove a node and all its descendants, detaching it from its parent.
    ///
    /// Returns the removed node's data, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }
        self.clear_children(id);
        self.children.remove(id);
        self.nodes.remove(id)
    }

    /// Get the parent of a node, if it is attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children of a node in insertion order. Empty if the node has none or
    /// does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the top, collecting ancestor ids (nearest first).
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Whether the tree contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the tree, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First direct child of `container` that is a rule with this exact
    /// selector text.
    pub fn find_rule(&self, container: NodeId, selector: &str) -> Option<NodeId> {
        self.children(container).iter().copied().find(|&child| {
            self.nodes
                .get(child)
                .and_then(Node::as_rule)
                .is_some_and(|rule| rule.selector == selector)
        })
    }

    /// First direct child of `container` that is an at-rule with this name
    /// and parameter text.
    pub fn find_at_rule(&self, container: NodeId, name: &str, params: Option<&str>) -> Option<NodeId> {
        self.children(container).iter().copied().find(|&child| {
            self.nodes
                .get(child)
                .and_then(Node::as_at_rule)
                .is_some_and(|at| at.name == name && at.params.as_deref() == params)
        })
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl Default for CssTree {
    fn default() -> Self {
        Self::new()
    }
}
