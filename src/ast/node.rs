//! Node types: NodeId, Node and its payloads.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a CSS AST node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// A style rule: `selector { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

/// An at-rule block: `@name params { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Keyword without the `@`.
    pub name: String,
    pub params: Option<String>,
}

impl AtRule {
    /// Create an at-rule with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: None,
        }
    }

    /// Set the prelude parameters (builder).
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Rendered head: `@name` or `@name params`.
    pub fn head(&self) -> String {
        match self.params.as_deref() {
            Some(params) if !params.is_empty() => format!("@{} {}", self.name, params),
            _ => format!("@{}", self.name),
        }
    }
}

/// A property declaration: `prop: value [!important]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    /// Create a normal (not `!important`) declaration.
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Set the `!important` flag (builder).
    pub fn important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }
}

/// Data associated with a single AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Top-level document container.
    Root,
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
}

impl Node {
    /// Whether this node may hold children.
    pub fn is_container(&self) -> bool {
        match self {
            Node::Root | Node::Rule(_) | Node::AtRule(_) => true,
            Node::Declaration(_) => false,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Node::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_at_rule(&self) -> Option<&AtRule> {
        match self {
            Node::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_defaults_to_not_important() {
        let decl = Declaration::new("color", "red");
        assert!(!decl.important);
        assert!(decl.important(true).important);
    }

    #[test]
    fn at_rule_head() {
        assert_eq!(AtRule::new("font-face").head(), "@font-face");
        assert_eq!(AtRule::new("media").with_params("").head(), "@media");
        assert_eq!(
            AtRule::new("media").with_params("print").head(),
            "@media print"
        );
    }

    #[test]
    fn containers() {
        assert!(Node::Root.is_container());
        assert!(Node::Rule(Rule::new(".a")).is_container());
        assert!(Node::AtRule(AtRule::new("media")).is_container());
        assert!(!Node::Declaration(Declaration::new("a", "b")).is_container());
    }

    #[test]
    fn accessors() {
        let node = Node::Rule(Rule::new(".a"));
        assert_eq!(node.as_rule().map(|r| r.selector.as_str()), Some(".a"));
        assert!(node.as_at_rule().is_none());
        assert!(node.as_declaration().is_none());
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
