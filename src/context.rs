//! The compilation context: one stylesheet being built.
//!
//! A [`Compilation`] owns the AST for a single compile pass. Nothing is
//! global: the context is passed explicitly to every styling call, and the
//! call order is the order of the rules in the output.
//!
//! Build tools drive a pass through [`Compilation::compile`] (or the free
//! functions [`compile`] and [`compile_fn`]), which clears the context, runs
//! the style module, renders the CSS and clears again.

use std::fmt;

use crate::ast::{AtRule, CssTree, NodeId};
use crate::builder::property::quote_syntax;
use crate::builder::{
    BuildError, CustomProperty, IntoSelector, Keyframes, Mixin, SelectorContext, Selection, Style,
    StyleValue,
};
use crate::config::RenderOptions;
use crate::selector::stringify::split_groups;
use crate::selector::Token;

// ---------------------------------------------------------------------------
// StyleModule
// ---------------------------------------------------------------------------

/// A unit of style definitions, evaluated once per compile pass.
pub trait StyleModule {
    fn define(&self, css: &mut Compilation) -> Result<(), BuildError>;
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Accumulates rules for one stylesheet.
#[derive(Debug, Clone)]
pub struct Compilation {
    tree: CssTree,
    root: NodeId,
    options: RenderOptions,
}

impl Compilation {
    /// An empty stylesheet with default render options.
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    pub fn with_options(options: RenderOptions) -> Self {
        let mut tree = CssTree::new();
        let root = tree.root();
        Self {
            tree,
            root,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The underlying AST.
    pub fn tree(&self) -> &CssTree {
        &self.tree
    }

    /// The document root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    // -- Selecting -----------------------------------------------------------

    /// Start a selection.
    pub fn select(&self, selector: impl IntoSelector) -> Result<Selection, BuildError> {
        selector.into_selection()
    }

    /// Select a comma-joined list of selectors.
    pub fn select_all<I>(&self, selectors: I) -> Result<Selection, BuildError>
    where
        I: IntoIterator,
        I::Item: IntoSelector,
    {
        let mut combined: Option<Selection> = None;
        for selector in selectors {
            let selection = selector.into_selection()?;
            combined = Some(match combined {
                Some(previous) => previous.union(selection),
                None => selection,
            });
        }
        combined.ok_or(BuildError::EmptySelector)
    }

    /// Select and style in one call.
    pub fn style(
        &mut self,
        selector: impl IntoSelector,
        style: impl Into<Style>,
    ) -> Result<Selection, BuildError> {
        selector.into_selection()?.style(self, style)
    }

    /// A mixin recording the given relative selectors (comma-joined).
    pub fn mixin<I>(&self, selectors: I) -> Result<Mixin, BuildError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let joined = selectors
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Mixin::parse(&joined)
    }

    /// An empty selection nested in `@media query`.
    pub fn media(&self, query: impl fmt::Display) -> Result<Selection, BuildError> {
        Selection::new().media(query)
    }

    /// An empty selection nested in `@container query`.
    pub fn container(&self, query: impl fmt::Display) -> Result<Selection, BuildError> {
        Selection::new().container(query)
    }

    /// An empty selection nested in `@supports condition`.
    pub fn supports(&self, condition: impl fmt::Display) -> Result<Selection, BuildError> {
        Selection::new().supports(condition)
    }

    // -- Identity-keyed at-rules ---------------------------------------------

    /// Register `@keyframes name`, replacing the steps of an earlier
    /// registration with the same name.
    pub fn keyframes<I, K, S>(&mut self, name: &str, steps: I) -> Result<Keyframes, BuildError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Style>,
    {
        let mut keyframes = Keyframes::new(name)?;
        for (offset, style) in steps {
            let offset: String = offset.into();
            if offset.trim().is_empty() {
                return Err(BuildError::EmptySelector);
            }
            keyframes.push_step(offset.trim(), style.into());
        }

        let node = self.find_or_replace("keyframes", keyframes.name())?;
        for (offset, style) in keyframes.steps() {
            let rule = self.tree.rule(offset.as_str());
            self.append_declarations(rule, style)?;
            self.tree.append(node, [rule])?;
        }
        Ok(keyframes)
    }

    /// Append an `@font-face` block.
    pub fn font_face(&mut self, style: impl Into<Style>) -> Result<(), BuildError> {
        let face = self.tree.at_rule("font-face", None);
        self.append_declarations(face, &style.into())?;
        self.tree.append(self.root, [face])?;
        tracing::trace!("appended @font-face");
        Ok(())
    }

    /// Register `@property --name`. `syntax` defaults to `"*"` and
    /// `inherits` to `false`; a later registration of the same name replaces
    /// the earlier descriptors.
    pub fn property(
        &mut self,
        name: &str,
        initial_value: impl Into<StyleValue>,
        syntax: Option<&str>,
        inherits: Option<bool>,
    ) -> Result<CustomProperty, BuildError> {
        let property = CustomProperty::parse(name)?;
        let node = self.find_or_replace("property", &property.name())?;
        let descriptors = Style::new()
            .set("syntax", quote_syntax(syntax.unwrap_or("*")))
            .set("inherits", if inherits.unwrap_or(false) { "true" } else { "false" })
            .set("initial-value", initial_value);
        self.append_declarations(node, &descriptors)?;
        Ok(property)
    }

    /// Declare `--name: value` on `:root` and return a reference to it.
    pub fn variable(
        &mut self,
        name: &str,
        value: impl Into<StyleValue>,
    ) -> Result<CustomProperty, BuildError> {
        let property = CustomProperty::parse(name)?;
        Selection::parse(":root")?.style(self, Style::new().set(&property.name(), value))?;
        Ok(property)
    }

    /// The top-level `@name params` block, emptied, or a new one at the end.
    fn find_or_replace(&mut self, name: &str, params: &str) -> Result<NodeId, BuildError> {
        match self.tree.find_at_rule(self.root, name, Some(params)) {
            Some(existing) => {
                tracing::trace!("replacing @{} {}", name, params);
                self.tree.clear_children(existing);
                Ok(existing)
            }
            None => {
                let node = self.tree.at_rule(name, Some(params));
                self.tree.append(self.root, [node])?;
                Ok(node)
            }
        }
    }

    // -- AST materialization -------------------------------------------------

    /// The rule node for `selection`, created on first use.
    ///
    /// The lookup key is the normalized selector text, searched among the
    /// direct children of the target container: the root, or the innermost
    /// of a fresh at-rule chain when the selection is nested in at-rules.
    pub fn get_or_create_rule(&mut self, selection: &Selection) -> Result<NodeId, BuildError> {
        let selector = selection.selector();
        if selector.trim().is_empty() {
            return Err(BuildError::EmptySelector);
        }
        // Rules are never nested, so a group like `> .a` has no anchor.
        if split_groups(selection.tokens())
            .iter()
            .any(|group| group.first().is_some_and(Token::is_combinator))
        {
            return Err(BuildError::RelativeSelector { selector });
        }

        let container = if selection.at_rules().is_empty() {
            self.root
        } else {
            self.create_at_rule(selection.at_rules())?
        };

        if let Some(existing) = self.tree.find_rule(container, &selector) {
            tracing::trace!("reusing rule {}", selector);
            return Ok(existing);
        }

        let rule = self.tree.rule(selector.as_str());
        self.tree.append(container, [rule])?;
        tracing::trace!("created rule {}", selector);
        Ok(rule)
    }

    /// Materialize `frames` as nested at-rules under the root and return the
    /// innermost one. Every call creates new nodes.
    pub fn create_at_rule(&mut self, frames: &[AtRule]) -> Result<NodeId, BuildError> {
        let (first, rest) = frames.split_first().ok_or(BuildError::NoAtRuleContext)?;

        let outer = self.tree.at_rule(first.name.as_str(), first.params.as_deref());
        self.tree.append(self.root, [outer])?;
        let mut current = outer;
        for frame in rest {
            let node = self.tree.at_rule(frame.name.as_str(), frame.params.as_deref());
            self.tree.append(current, [node])?;
            current = node;
        }
        tracing::trace!("created at-rule chain of depth {}", frames.len());
        Ok(current)
    }

    /// Append one declaration per present value in `style` to `container`.
    pub fn append_declarations(&mut self, container: NodeId, style: &Style) -> Result<(), BuildError> {
        let ids: Vec<NodeId> = style
            .declarations()
            .into_iter()
            .map(|decl| self.tree.decl(decl))
            .collect();
        self.tree.append(container, ids)?;
        Ok(())
    }

    // -- Lifecycle -----------------------------------------------------------

    /// Render the stylesheet with this context's options.
    pub fn build(&self) -> String {
        self.build_with(&self.options)
    }

    /// Render the stylesheet with other options.
    pub fn build_with(&self, options: &RenderOptions) -> String {
        let css = self.tree.stringify(self.root, options);
        tracing::debug!("built stylesheet: {} nodes, {} bytes", self.tree.len(), css.len());
        css
    }

    /// Reset to an empty stylesheet. Render options are kept.
    pub fn clear(&mut self) {
        self.tree = CssTree::new();
        self.root = self.tree.root();
        tracing::debug!("cleared compilation context");
    }

    /// Run one compile pass: clear, define, build, clear.
    ///
    /// On error nothing is returned and the context is left empty.
    pub fn compile(&mut self, module: &dyn StyleModule) -> Result<String, BuildError> {
        self.compile_fn(|css| module.define(css))
    }

    /// [`Compilation::compile`] for a closure.
    pub fn compile_fn<F>(&mut self, define: F) -> Result<String, BuildError>
    where
        F: FnOnce(&mut Compilation) -> Result<(), BuildError>,
    {
        self.clear();
        let result = define(self).map(|()| self.build());
        self.clear();
        match &result {
            Ok(css) => tracing::debug!("compiled module: {} bytes", css.len()),
            Err(err) => tracing::debug!("compilation aborted: {}", err),
        }
        result
    }
}

impl Default for Compilation {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile `module` on a fresh context with default options.
pub fn compile(module: &dyn StyleModule) -> Result<String, BuildError> {
    Compilation::new().compile(module)
}

/// Compile a closure on a fresh context with default options.
pub fn compile_fn<F>(define: F) -> Result<String, BuildError>
where
    F: FnOnce(&mut Compilation) -> Result<(), BuildError>,
{
    Compilation::new().compile_fn(define)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use crate::selector::TokenizeError;
    use crate::builder::{important, PseudoClasses, PseudoElements};
    use pretty_assertions::assert_eq;

    fn color(value: &str) -> Style {
        Style::new().set("color", value)
    }

    // ── Rule lookup ──────────────────────────────────────────────────

    #[test]
    fn same_selector_merges_into_one_rule() {
        let mut css = Compilation::new();
        css.select(".btn").unwrap().style(&mut css, color("red")).unwrap();
        css.select(".btn").unwrap().style(&mut css, Style::new().set("padding", 4)).unwrap();
        assert_eq!(css.tree().children(css.root()).len(), 1);
        assert_eq!(css.build(), ".btn {\n    color: red;\n    padding: 4;\n}");
    }

    #[test]
    fn whitespace_variants_share_a_rule() {
        let mut css = Compilation::new();
        css.style("ul>li", color("red")).unwrap();
        css.style("ul  >  li", color("blue")).unwrap();
        assert_eq!(css.build(), "ul > li {\n    color: red;\n    color: blue;\n}");
    }

    #[test]
    fn empty_selection_cannot_be_styled() {
        let mut css = Compilation::new();
        assert_eq!(
            Selection::new().style(&mut css, color("red")).unwrap_err(),
            BuildError::EmptySelector
        );
        assert_eq!(css.style("", color("red")).unwrap_err(), BuildError::EmptySelector);
        assert_eq!(
            css.media("print").unwrap().style(&mut css, color("red")).unwrap_err(),
            BuildError::EmptySelector
        );
    }

    #[test]
    fn no_at_rule_context() {
        let mut css = Compilation::new();
        assert_eq!(css.create_at_rule(&[]).unwrap_err(), BuildError::NoAtRuleContext);
    }

    #[test]
    fn relative_selection_cannot_be_styled() {
        let mut css = Compilation::new();
        assert_eq!(
            Selection::new()
                .child(".a")
                .unwrap()
                .style(&mut css, color("red"))
                .unwrap_err(),
            BuildError::RelativeSelector {
                selector: "> .a".into()
            }
        );
        assert!(matches!(
            css.style(".b, + .c", color("red")),
            Err(BuildError::RelativeSelector { .. })
        ));
        assert!(css.tree().children(css.root()).is_empty());
    }

    #[test]
    fn empty_group_in_list_is_rejected() {
        let mut css = Compilation::new();
        assert!(matches!(
            css.style("a,", color("red")),
            Err(BuildError::Tokenize(TokenizeError::EmptyGroup { .. }))
        ));
        assert!(css.tree().children(css.root()).is_empty());
    }

    // ── At-rules ─────────────────────────────────────────────────────

    #[test]
    fn media_nesting() {
        let mut css = Compilation::new();
        css.select(".box")
            .unwrap()
            .media("(min-width: 768px)")
            .unwrap()
            .style(&mut css, Style::new().set("flexDirection", "column"))
            .unwrap();
        assert_eq!(
            css.build(),
            "@media (min-width: 768px) {\n    .box {\n        flex-direction: column;\n    }\n}"
        );
    }

    #[test]
    fn context_media_then_select() {
        let mut css = Compilation::new();
        css.media("print")
            .unwrap()
            .select("nav")
            .unwrap()
            .style(&mut css, Style::new().set("display", "none"))
            .unwrap();
        assert_eq!(css.build(), "@media print {\n    nav {\n        display: none;\n    }\n}");
    }

    #[test]
    fn at_rules_are_not_deduplicated() {
        let mut css = Compilation::new();
        let print = css.media("print").unwrap();
        print.select(".a").unwrap().style(&mut css, color("black")).unwrap();
        print.select(".b").unwrap().style(&mut css, color("black")).unwrap();
        assert_eq!(css.tree().children(css.root()).len(), 2);
    }

    #[test]
    fn nested_at_rule_chain() {
        let mut css = Compilation::new();
        css.select(".a")
            .unwrap()
            .supports("(display: grid)")
            .unwrap()
            .media("screen")
            .unwrap()
            .style(&mut css, Style::new().set("display", "grid"))
            .unwrap();
        assert_eq!(
            css.build(),
            "@supports (display: grid) {\n    @media screen {\n        .a {\n            display: grid;\n        }\n    }\n}"
        );
    }

    // ── Keyframes, properties, font-face ─────────────────────────────

    #[test]
    fn keyframes_register_and_replace() {
        let mut css = Compilation::new();
        let fade = css
            .keyframes("fade", [("from", Style::new().set("opacity", 0)), ("to", Style::new().set("opacity", 1))])
            .unwrap();
        css.style(".toast", Style::new().set("animationName", &fade)).unwrap();
        css.keyframes("fade", [("50%", Style::new().set("opacity", 0.5))]).unwrap();
        assert_eq!(
            css.build(),
            "@keyframes fade {\n    50% {\n        opacity: 0.5;\n    }\n}\n.toast {\n    animation-name: fade;\n}"
        );
    }

    #[test]
    fn keyframes_reject_empty_offsets_and_names() {
        let mut css = Compilation::new();
        assert!(css.keyframes("", [("to", Style::new())]).is_err());
        assert_eq!(
            css.keyframes("x", [(" ", Style::new())]).unwrap_err(),
            BuildError::EmptySelector
        );
    }

    #[test]
    fn property_registration() {
        let mut css = Compilation::new();
        let angle = css.property("angle", "0deg", Some("<angle>"), Some(true)).unwrap();
        assert_eq!(angle.to_string(), "var(--angle)");
        css.property("--any", None::<&str>, None, None).unwrap();
        assert_eq!(
            css.build(),
            "@property --angle {\n    syntax: \"<angle>\";\n    inherits: true;\n    initial-value: 0deg;\n}\n@property --any {\n    syntax: \"*\";\n    inherits: false;\n}"
        );
    }

    #[test]
    fn property_replaces_by_name() {
        let mut css = Compilation::new();
        css.property("size", "1px", Some("<length>"), None).unwrap();
        css.property("size", "2px", Some("<length>"), None).unwrap();
        assert_eq!(css.tree().children(css.root()).len(), 1);
        assert!(css.build().contains("initial-value: 2px;"));
        assert!(!css.build().contains("1px"));
    }

    #[test]
    fn variables_collect_on_root() {
        let mut css = Compilation::new();
        let brand = css.variable("brand", "#0af").unwrap();
        let gap = css.variable("--gap", 8).unwrap();
        css.style(".a", Style::new().set("color", &brand).set("gap", gap)).unwrap();
        assert_eq!(
            css.build(),
            ":root {\n    --brand: #0af;\n    --gap: 8;\n}\n.a {\n    color: var(--brand);\n    gap: var(--gap);\n}"
        );
    }

    #[test]
    fn font_face_blocks() {
        let mut css = Compilation::new();
        css.font_face(Style::new().set("fontFamily", "\"Inter\"").set("src", "url(inter.woff2)"))
            .unwrap();
        assert_eq!(
            css.build(),
            "@font-face {\n    font-family: \"Inter\";\n    src: url(inter.woff2);\n}"
        );
    }

    // ── Mixins and usables ───────────────────────────────────────────

    #[test]
    fn apply_style_and_mixin() {
        let mut css = Compilation::new();
        let base = Style::new().set("border", 0);
        let hover = css.mixin([":hover"]).unwrap().style(color("blue"));
        css.select(".link").unwrap().apply(&mut css, &[&base, &hover]).unwrap();
        assert_eq!(
            css.build(),
            ".link {\n    border: 0;\n}\n.link:hover {\n    color: blue;\n}"
        );
    }

    #[test]
    fn mixin_distributes_over_groups() {
        let mut css = Compilation::new();
        let icon = Mixin::new().after().style(Style::new().set("content", "\"→\""));
        css.select_all(["a", "button"]).unwrap().apply(&mut css, &[&icon]).unwrap();
        assert_eq!(css.build(), "a::after, button::after {\n    content: \"→\";\n}");
    }

    #[test]
    fn mixin_with_nesting_selector() {
        let mut css = Compilation::new();
        let dark = css.mixin([".dark &"]).unwrap().style(color("white"));
        css.select(".card").unwrap().apply(&mut css, &[&dark]).unwrap();
        assert_eq!(css.build(), ".dark .card {\n    color: white;\n}");
    }

    // ── Declarations ─────────────────────────────────────────────────

    #[test]
    fn important_and_absent_values() {
        let mut css = Compilation::new();
        css.style(
            "p",
            Style::new()
                .set("color", important("red"))
                .set("margin", None::<&str>)
                .set("lineHeight", 1.5),
        )
        .unwrap();
        assert_eq!(css.build(), "p {\n    color: red !important;\n    line-height: 1.5;\n}");
    }

    #[test]
    fn pseudo_chain_from_shared_base() {
        let mut css = Compilation::new();
        let button = css.select(".button").unwrap();
        button.hover().style(&mut css, color("blue")).unwrap();
        button.active().after().style(&mut css, color("red")).unwrap();
        button.style(&mut css, color("black")).unwrap();
        assert_eq!(
            css.build(),
            ".button:hover {\n    color: blue;\n}\n.button:active::after {\n    color: red;\n}\n.button {\n    color: black;\n}"
        );
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    #[test]
    fn clear_resets_document() {
        let mut css = Compilation::new();
        css.style(".a", color("red")).unwrap();
        css.clear();
        assert_eq!(css.build(), "");
        assert_eq!(css.tree().len(), 1);
        assert!(matches!(css.tree().get(css.root()), Some(Node::Root)));
    }

    #[test]
    fn build_reflects_later_calls() {
        let mut css = Compilation::new();
        css.style(".a", color("red")).unwrap();
        let first = css.build();
        css.style(".b", color("blue")).unwrap();
        assert_ne!(first, css.build());
        assert_eq!(css.build(), ".a {\n    color: red;\n}\n.b {\n    color: blue;\n}");
    }

    #[test]
    fn build_with_options() {
        let mut css = Compilation::with_options(RenderOptions::new().with_indent("  "));
        css.style(".a", color("red")).unwrap();
        assert_eq!(css.build(), ".a {\n  color: red;\n}");
        assert_eq!(
            css.build_with(&RenderOptions::new().with_semicolon(false)),
            ".a {\n    color: red\n}"
        );
    }

    struct Buttons;

    impl StyleModule for Buttons {
        fn define(&self, css: &mut Compilation) -> Result<(), BuildError> {
            css.style(".btn", color("red"))?;
            Ok(())
        }
    }

    #[test]
    fn compile_passes_are_isolated() {
        let mut css = Compilation::new();
        css.style(".leftover", color("gray")).unwrap();
        assert_eq!(css.compile(&Buttons).unwrap(), ".btn {\n    color: red;\n}");
        assert_eq!(css.build(), "");
        assert_eq!(compile(&Buttons).unwrap(), ".btn {\n    color: red;\n}");
    }

    #[test]
    fn compile_aborts_on_error() {
        let mut css = Compilation::new();
        let result = css.compile_fn(|css| {
            css.style(".ok", color("red"))?;
            css.style("a > > b", color("red"))?;
            Ok(())
        });
        assert!(matches!(result, Err(BuildError::Tokenize(_))));
        assert_eq!(css.build(), "");
    }
}
