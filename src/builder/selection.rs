//! The `Selection` builder: a persistent selector context.
//!
//! A [`Selection`] is an immutable value holding selector tokens plus the
//! at-rules it is nested in. Every navigation or pseudo method returns a new
//! `Selection`, so one value can serve as the base for any number of
//! divergent extensions:
//!
//! ```
//! use stylecraft::prelude::*;
//!
//! # fn main() -> Result<(), BuildError> {
//! let mut css = Compilation::new();
//! let button = css.select(".button")?;
//! button.style(&mut css, Style::new().set("color", "black"))?;
//! button.hover().style(&mut css, Style::new().set("color", "blue"))?;
//! button.child("svg")?.style(&mut css, Style::new().set("fill", "currentColor"))?;
//! assert_eq!(
//!     css.build(),
//!     ".button {\n    color: black;\n}\n.button:hover {\n    color: blue;\n}\n.button > svg {\n    fill: currentColor;\n}"
//! );
//! # Ok(())
//! # }
//! ```

use std::fmt;

use crate::ast::AtRule;
use crate::context::Compilation;
use crate::selector::stringify::{join_groups, split_groups};
use crate::selector::{stringify, tokenize, tokenize_at_rule, Combinator, Token, TokenKind, TokenizeError};

use super::mixin::Usable;
use super::pseudo::SelectorContext;
use super::style::Style;
use super::BuildError;

// ---------------------------------------------------------------------------
// IntoSelector
// ---------------------------------------------------------------------------

/// Anything that can be turned into a [`Selection`]: selector text or an
/// existing selection.
pub trait IntoSelector {
    fn into_selection(self) -> Result<Selection, BuildError>;
}

impl IntoSelector for &str {
    fn into_selection(self) -> Result<Selection, BuildError> {
        Selection::parse(self)
    }
}

impl IntoSelector for String {
    fn into_selection(self) -> Result<Selection, BuildError> {
        Selection::parse(&self)
    }
}

impl IntoSelector for &String {
    fn into_selection(self) -> Result<Selection, BuildError> {
        Selection::parse(self)
    }
}

impl IntoSelector for Selection {
    fn into_selection(self) -> Result<Selection, BuildError> {
        Ok(self)
    }
}

impl IntoSelector for &Selection {
    fn into_selection(self) -> Result<Selection, BuildError> {
        Ok(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A selector context: tokens plus the enclosing at-rules, outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    tokens: Vec<Token>,
    at_rules: Vec<AtRule>,
}

impl Selection {
    /// An empty selection, not nested in any at-rule.
    pub fn new() -> Self {
        Self::from_tokens(Vec::new())
    }

    /// Tokenize selector text.
    pub fn parse(selector: &str) -> Result<Self, BuildError> {
        Ok(Self::from_tokens(tokenize(selector)?))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            at_rules: Vec::new(),
        }
    }

    /// Enclosing at-rules, outermost first.
    pub fn at_rules(&self) -> &[AtRule] {
        &self.at_rules
    }

    /// The normalized selector text. This is the rule lookup key.
    pub fn selector(&self) -> String {
        stringify(&self.tokens)
    }

    /// Whether there are no selector tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    // -- Navigation ----------------------------------------------------------

    /// `self > other`.
    pub fn child(&self, other: impl IntoSelector) -> Result<Self, BuildError> {
        self.combine(Some(Combinator::Child), other.into_selection()?)
    }

    /// `self other`.
    pub fn descendant(&self, other: impl IntoSelector) -> Result<Self, BuildError> {
        self.combine(Some(Combinator::Descendant), other.into_selection()?)
    }

    /// `self ~ other`.
    pub fn sibling(&self, other: impl IntoSelector) -> Result<Self, BuildError> {
        self.combine(Some(Combinator::Sibling), other.into_selection()?)
    }

    /// `self + other`.
    pub fn adjacent(&self, other: impl IntoSelector) -> Result<Self, BuildError> {
        self.combine(Some(Combinator::Adjacent), other.into_selection()?)
    }

    /// Scope `other` inside this selection.
    ///
    /// Without a `&`, `other` becomes a descendant (`.container .button`). A
    /// leading combinator makes it relative (`> li`), and every `&` in
    /// `other` is replaced by this selection (`&:hover`, `.dark &`). The
    /// at-rules of both selections are kept, ours first.
    pub fn select(&self, other: impl IntoSelector) -> Result<Self, BuildError> {
        self.combine(Some(Combinator::Descendant), other.into_selection()?)
    }

    /// Compound extension: `.a` and `.b` gives `.a.b`.
    pub fn and(&self, other: impl IntoSelector) -> Result<Self, BuildError> {
        self.combine(None, other.into_selection()?)
    }

    /// Drop the last compound selector (and the combinator before it) from
    /// every group. Groups made of a single compound disappear.
    pub fn parent(&self) -> Self {
        let groups = split_groups(&self.tokens)
            .into_iter()
            .filter_map(|group| {
                let cut = group.iter().rposition(Token::is_combinator)?;
                (cut > 0).then(|| group[..cut].to_vec())
            })
            .collect::<Vec<_>>();
        self.with_tokens(join_groups(groups))
    }

    /// The selector list `self, other`.
    pub(crate) fn union(mut self, other: Selection) -> Self {
        self.tokens = join_groups([self.tokens, other.tokens].into_iter().filter(|t| !t.is_empty()));
        self.at_rules.extend(other.at_rules);
        self
    }

    /// Join every group of `self` with every group of `other`.
    pub(crate) fn combine(
        &self,
        combinator: Option<Combinator>,
        other: Selection,
    ) -> Result<Self, BuildError> {
        let right = split_groups(&other.tokens);
        if right.is_empty() {
            return Err(BuildError::EmptySelector);
        }
        let left = split_groups(&self.tokens);
        let left = if left.is_empty() { vec![&[][..]] } else { left };

        let mut groups = Vec::with_capacity(left.len() * right.len());
        for l in &left {
            for r in &right {
                groups.push(attach(l, combinator, r)?);
            }
        }

        let mut at_rules = self.at_rules.clone();
        at_rules.extend(other.at_rules);
        Ok(Self {
            tokens: join_groups(groups),
            at_rules,
        })
    }

    // -- At-rule context -----------------------------------------------------

    /// Nest inside `@media query`.
    pub fn media(&self, query: impl fmt::Display) -> Result<Self, BuildError> {
        self.at_rule("media", Some(&query.to_string()))
    }

    /// Nest inside `@container query`.
    pub fn container(&self, query: impl fmt::Display) -> Result<Self, BuildError> {
        self.at_rule("container", Some(&query.to_string()))
    }

    /// Nest inside `@supports condition`.
    pub fn supports(&self, condition: impl fmt::Display) -> Result<Self, BuildError> {
        self.at_rule("supports", Some(&condition.to_string()))
    }

    /// Nest inside an arbitrary at-rule. The parameters are tokenized and
    /// normalized (`(min-width:768px)` becomes `(min-width: 768px)`).
    pub fn at_rule(&self, name: &str, params: Option<&str>) -> Result<Self, BuildError> {
        let frame = normalize_at_rule(name, params)?;
        let mut next = self.clone();
        next.at_rules.push(frame);
        Ok(next)
    }

    // -- Styling -------------------------------------------------------------

    /// Append `style`'s declarations to the rule for this selection,
    /// creating the rule on first use.
    pub fn style(&self, css: &mut Compilation, style: impl Into<Style>) -> Result<Self, BuildError> {
        let style = style.into();
        let rule = css.get_or_create_rule(self)?;
        css.append_declarations(rule, &style)?;
        Ok(self.clone())
    }

    /// Apply reusable styles and mixins, in order.
    pub fn apply(&self, css: &mut Compilation, usables: &[&dyn Usable]) -> Result<Self, BuildError> {
        for usable in usables {
            usable.apply_to(css, self)?;
        }
        Ok(self.clone())
    }
}

/// Build one group: `left`, the combinator, then `right`.
fn attach(left: &[Token], combinator: Option<Combinator>, right: &[Token]) -> Result<Vec<Token>, BuildError> {
    let mut group = Vec::with_capacity(left.len() + right.len() + 1);

    if right.iter().any(|t| t.kind == TokenKind::Nesting) {
        for token in right {
            if token.kind == TokenKind::Nesting {
                group.extend_from_slice(left);
            } else {
                group.push(token.clone());
            }
        }
        return Ok(group);
    }

    let relative = right.first().is_some_and(Token::is_combinator);
    if combinator.is_none() && right.first().is_some_and(is_type_like) {
        return merge_compound(left, right);
    }

    group.extend_from_slice(left);
    match (combinator, relative) {
        (None | Some(Combinator::Descendant), true) => {}
        (Some(_), true) => {
            return Err(TokenizeError::DanglingCombinator { position: 0 }.into());
        }
        (Some(Combinator::Descendant), false) if left.is_empty() => {}
        (Some(c), false) => group.push(Token::combinator(c)),
        (None, false) => {}
    }
    group.extend_from_slice(right);
    Ok(group)
}

fn is_type_like(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Type { .. } | TokenKind::Universal { .. })
}

/// Compound extension by a fragment that starts with a type or universal
/// selector: the type moves to the front of the last compound of `left`
/// (`.a` and `div` gives `div.a`).
fn merge_compound(left: &[Token], right: &[Token]) -> Result<Vec<Token>, BuildError> {
    let start = left
        .iter()
        .rposition(Token::is_combinator)
        .map_or(0, |i| i + 1);
    if left.get(start).is_some_and(is_type_like) {
        return Err(BuildError::ConflictingTypeSelector {
            left: stringify(&left[start..]),
            right: stringify(&right[..1]),
        });
    }

    let mut group = Vec::with_capacity(left.len() + right.len());
    group.extend_from_slice(&left[..start]);
    group.push(right[0].clone());
    group.extend_from_slice(&left[start..]);
    group.extend_from_slice(&right[1..]);
    Ok(group)
}

/// Validate and normalize an at-rule frame.
fn normalize_at_rule(name: &str, params: Option<&str>) -> Result<AtRule, BuildError> {
    let name = name.trim().trim_start_matches('@');
    let params = params.map(str::trim).filter(|p| !p.is_empty());
    let source = match params {
        Some(params) => format!("@{name} {params}"),
        None => format!("@{name}"),
    };
    let tokens = tokenize_at_rule(&source)?;
    let at_rule = AtRule::new(name);
    Ok(match tokens.get(1..) {
        Some(rest) if !rest.is_empty() => at_rule.with_params(stringify(rest)),
        _ => at_rule,
    })
}

impl SelectorContext for Selection {
    fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn with_tokens(&self, tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            at_rules: self.at_rules.clone(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector())
    }
}
