//! Render an AST subtree to CSS text.
//!
//! Rendering re-walks the tree on every call, so output always reflects the
//! current shape.

use super::node::{Node, NodeId};
use super::tree::CssTree;
use crate::config::RenderOptions;

/// Render `node` and everything beneath it.
///
/// A root renders its children separated by newlines. Any other node renders
/// as if it sat at the top level (depth zero). Unknown ids render as `""`.
pub fn stringify(tree: &CssTree, node: NodeId, options: &RenderOptions) -> String {
    let mut out = String::new();
    match tree.get(node) {
        Some(Node::Root) => render_children(tree, node, 0, options, &mut out),
        Some(_) => render_node(tree, node, 0, options, &mut out),
        None => {}
    }
    out
}

fn render_children(
    tree: &CssTree,
    parent: NodeId,
    depth: usize,
    options: &RenderOptions,
    out: &mut String,
) {
    for (i, &child) in tree.children(parent).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_node(tree, child, depth, options, out);
    }
}

fn render_node(tree: &CssTree, id: NodeId, depth: usize, options: &RenderOptions, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let pad = options.pad(depth);

    match node {
        Node::Root => render_children(tree, id, depth, options, out),
        Node::Rule(rule) => render_block(tree, id, &rule.selector, depth, options, out),
        Node::AtRule(at_rule) => render_block(tree, id, &at_rule.head(), depth, options, out),
        Node::Declaration(decl) => {
            out.push_str(&pad);
            out.push_str(&decl.prop);
            out.push_str(": ");
            out.push_str(&decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            if options.semicolon {
                out.push(';');
            }
        }
    }
}

fn render_block(
    tree: &CssTree,
    id: NodeId,
    head: &str,
    depth: usize,
    options: &RenderOptions,
    out: &mut String,
) {
    let pad = options.pad(depth);
    out.push_str(&pad);
    out.push_str(head);
    out.push_str(" {\n");
    if !tree.children(id).is_empty() {
        render_children(tree, id, depth + 1, options, out);
        out.push('\n');
    }
    out.push_str(&pad);
    out.push('}');
}

impl CssTree {
    /// Render the subtree rooted at `node`. See [`stringify`].
    pub fn stringify(&self, node: NodeId, options: &RenderOptions) -> String {
        stringify(self, node, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::node::Declaration;

    // ── Blocks ───────────────────────────────────────────────────────

    #[test]
    fn single_rule() {
        let mut tree = CssTree::new();
        let root = tree.root();
        let rule = tree.rule(".foo");
        let color = tree.decl(Declaration::new("color", "red"));
        tree.append(rule, [color]).unwrap();
        tree.append(root, [rule]).unwrap();
        assert_eq!(
            tree.stringify(root, &RenderOptions::default()),
            ".foo {\n    color: red;\n}"
        );
    }

    #[test]
    fn nested_at_rule() {
        let mut tree = CssTree::new();
        let root = tree.root();
        let media = tree.at_rule("media", Some("(min-width: 768px)"));
        let rule = tree.rule(".box");
        let decl = tree.decl(Declaration::new("flex-direction", "column"));
        tree.append(rule, [decl]).unwrap();
        tree.append(media, [rule]).unwrap();
        tree.append(root, [media]).unwrap();
        assert_eq!(
            stringify(&tree, root, &RenderOptions::default()),
            "@media (min-width: 768px) {\n    .box {\n        flex-direction: column;\n    }\n}"
        );
    }

    #[test]
    fn empty_block_has_no_blank_line() {
        let mut tree = CssTree::new();
        let root = tree.root();
        let rule = tree.rule(".empty");
        tree.append(root, [rule]).unwrap();
        assert_eq!(tree.stringify(root, &RenderOptions::default()), ".empty {\n}");
    }

    #[test]
    fn empty_nested_block_closes_at_its_indent() {
        let mut tree = CssTree::new();
        let root = tree.root();
        let media = tree.at_rule("media", Some("print"));
        let rule = tree.rule(".a");
        tree.append(media, [rule]).unwrap();
        tree.append(root, [media]).unwrap();
        assert_eq!(
            tree.stringify(root, &RenderOptions::default()),
            "@media print {\n    .a {\n    }\n}"
        );
    }

    #[test]
    fn siblings_separated_by_newline() {
        let mut tree = CssTree::new();
        let root = tree.root();
        let a = tree.rule(".a");
        let b = tree.rule(".b");
        let face = tree.at_rule("font-face", None);
        tree.append(root, [a, face, b]).unwrap();
        assert_eq!(
            tree.stringify(root, &RenderOptions::default()),
            ".a {\n}\n@font-face {\n}\n.b {\n}"
        );
    }

    // ── Declarations ─────────────────────────────────────────────────

    #[test]
    fn important_and_semicolon_options() {
        let mut tree = CssTree::new();
        let root = tree.root();
        let rule = tree.rule("p");
        let a = tree.decl(Declaration::new("color", "red").important(true));
        let b = tree.decl(Declaration::new("margin", "0"));
        tree.append(rule, [a, b]).unwrap();
        tree.append(root, [rule]).unwrap();

        assert_eq!(
            tree.stringify(root, &RenderOptions::default()),
            "p {\n    color: red !important;\n    margin: 0;\n}"
        );
        let options = RenderOptions::new().with_indent("\t").with_semicolon(false);
        assert_eq!(
            tree.stringify(root, &options),
            "p {\n\tcolor: red !important\n\tmargin: 0\n}"
        );
    }

    #[test]
    fn top_level_declaration_is_unindented() {
        let mut tree = CssTree::new();
        let root = tree.root();
        let decl = tree.decl(Declaration::new("color", "red"));
        tree.append(root, [decl]).unwrap();
        assert_eq!(tree.stringify(root, &RenderOptions::default()), "color: red;");
    }

    // ── Re-rendering ─────────────────────────────────────────────────

    #[test]
    fn render_reflects_later_mutation() {
        let mut tree = CssTree::new();
        let root = tree.root();
        let options = RenderOptions::default();
        assert_eq!(tree.stringify(root, &options), "");

        let rule = tree.rule(".a");
        tree.append(root, [rule]).unwrap();
        assert_eq!(tree.stringify(root, &options), ".a {\n}");

        let decl = tree.decl(Declaration::new("top", "0"));
        tree.append(rule, [decl]).unwrap();
        assert_eq!(tree.stringify(root, &options), ".a {\n    top: 0;\n}");
    }

    #[test]
    fn subtree_renders_at_depth_zero() {
        let mut tree = CssTree::new();
        let media = tree.at_rule("media", Some("print"));
        let rule = tree.rule(".a");
        let decl = tree.decl(Declaration::new("color", "black"));
        tree.append(rule, [decl]).unwrap();
        tree.append(media, [rule]).unwrap();
        assert_eq!(
            tree.stringify(rule, &RenderOptions::default()),
            ".a {\n    color: black;\n}"
        );
    }
}
