//! Reusable style bundles and mixins.

use std::fmt;

use crate::context::Compilation;
use crate::selector::{stringify, tokenize, Token};

use super::pseudo::SelectorContext;
use super::selection::Selection;
use super::style::Style;
use super::BuildError;

/// Something that can be applied to a selection with
/// [`Selection::apply`].
pub trait Usable {
    fn apply_to(&self, css: &mut Compilation, target: &Selection) -> Result<(), BuildError>;
}

impl Usable for Style {
    fn apply_to(&self, css: &mut Compilation, target: &Selection) -> Result<(), BuildError> {
        target.style(css, self)?;
        Ok(())
    }
}

/// A recorded selector extension plus a style bundle.
///
/// Applying a mixin extends the target's selector with the recorded tokens
/// and styles that extended selector. The tokens attach as a compound
/// (`:hover` on `.button` gives `.button:hover`), may start with a combinator
/// (`> svg`), or may place the target explicitly with `&` (`.dark &`). A
/// mixin with no tokens styles the target itself.
///
/// ```
/// use stylecraft::prelude::*;
///
/// # fn main() -> Result<(), BuildError> {
/// let mut css = Compilation::new();
/// let lift = Mixin::new().hover().style(Style::new().set("transform", "translateY(-1px)"));
/// css.select(".card")?.apply(&mut css, &[&lift])?;
/// assert_eq!(css.build(), ".card:hover {\n    transform: translateY(-1px);\n}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mixin {
    tokens: Vec<Token>,
    style: Style,
}

impl Mixin {
    /// A mixin with no selector extension and no styles.
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            style: Style::new(),
        }
    }

    /// A mixin recording the given relative selector.
    pub fn parse(selector: &str) -> Result<Self, BuildError> {
        Ok(Self {
            tokens: tokenize(selector)?,
            style: Style::new(),
        })
    }

    /// Add declarations (builder). Later values win on repeated properties.
    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = self.style.merge(&style.into());
        self
    }

    /// The recorded selector extension, normalized.
    pub fn selector(&self) -> String {
        stringify(&self.tokens)
    }

    pub fn styles(&self) -> &Style {
        &self.style
    }
}

impl SelectorContext for Mixin {
    fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn with_tokens(&self, tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            style: self.style.clone(),
        }
    }
}

impl Usable for Mixin {
    fn apply_to(&self, css: &mut Compilation, target: &Selection) -> Result<(), BuildError> {
        let extended = if self.tokens.is_empty() {
            target.clone()
        } else {
            target.combine(None, Selection::from_tokens(self.tokens.clone()))?
        };
        extended.style(css, &self.style)?;
        Ok(())
    }
}

impl fmt::Display for Mixin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector())
    }
}
