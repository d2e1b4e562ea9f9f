//! Fluent builders that turn selector and style calls into AST mutations.
//!
//! - [`Selection`]: a persistent selector context with navigation, at-rule
//!   nesting and styling.
//! - [`PseudoClasses`] / [`PseudoElements`]: generated pseudo methods shared
//!   by every [`SelectorContext`].
//! - [`Style`] / [`StyleValue`]: ordered, reusable declaration bundles.
//! - [`Mixin`]: a selector extension plus a style bundle.
//! - [`MediaQuery`] / [`ContainerQuery`]: typed query text.
//! - [`Keyframes`] / [`CustomProperty`]: handles for registered at-rules.

pub mod keyframes;
pub mod mixin;
pub mod property;
pub mod pseudo;
pub mod query;
pub mod selection;
pub mod style;

pub use keyframes::Keyframes;
pub use mixin::{Mixin, Usable};
pub use property::CustomProperty;
pub use pseudo::{PseudoClasses, PseudoElements, SelectorContext, PSEUDO_CLASSES, PSEUDO_ELEMENTS};
pub use query::{ContainerQuery, MediaQuery};
pub use selection::{IntoSelector, Selection};
pub use style::{important, to_kebab_case, Style, StyleValue};

use crate::ast::AstError;
use crate::selector::TokenizeError;

/// Errors raised while building a stylesheet. Any of them aborts the
/// compilation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("selector is empty; select something before styling it")]
    EmptySelector,
    #[error("no at-rule in the current context")]
    NoAtRuleContext,
    #[error("cannot merge type selector {right:?} into compound {left:?}")]
    ConflictingTypeSelector { left: String, right: String },
    #[error("relative selector {selector:?} has nothing to attach to")]
    RelativeSelector { selector: String },
    #[error("invalid {kind} name: {name:?}")]
    InvalidName { kind: &'static str, name: String },
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Ast(#[from] AstError),
}
