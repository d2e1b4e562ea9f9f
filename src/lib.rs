//! # stylecraft
//!
//! Describe CSS programmatically and compile it to stylesheet text.
//!
//! Selectors are tokenized into a typed token model, accumulated by a
//! persistent builder, materialized into a small CSS AST with rule
//! deduplication and at-rule nesting, and rendered with configurable
//! indentation.
//!
//! ```
//! use stylecraft::prelude::*;
//!
//! # fn main() -> Result<(), BuildError> {
//! let css = compile_fn(|css| {
//!     let button = css.select(".button")?;
//!     button.style(css, Style::new().set("color", "black").set("padding", 0))?;
//!     button.hover().style(css, Style::new().set("color", "blue"))?;
//!     button
//!         .media(MediaQuery::print())?
//!         .style(css, Style::new().set("display", "none"))?;
//!     Ok(())
//! })?;
//!
//! assert_eq!(
//!     css,
//!     ".button {\n    color: black;\n    padding: 0;\n}\n\
//!      .button:hover {\n    color: blue;\n}\n\
//!      @media print {\n    .button {\n        display: none;\n    }\n}"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Systems
//!
//! - **[`selector`]**: token model, selector and at-rule tokenizers, stringifier
//! - **[`ast`]**: slotmap-backed CSS tree with append semantics and rendering
//! - **[`builder`]**: selections, pseudo methods, styles, mixins, queries
//! - **[`context`]**: the compilation context and compile-pass lifecycle
//! - **[`config`]**: render options

// Foundation
pub mod config;
pub mod selector;

// Tree
pub mod ast;

// Builders
pub mod builder;
pub mod context;

pub use builder::{BuildError, Style, StyleValue};
pub use context::{compile, compile_fn, Compilation, StyleModule};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use stylecraft_macros::style;

/// Everything needed to write a style module.
pub mod prelude {
    pub use crate::builder::{
        important, BuildError, ContainerQuery, CustomProperty, IntoSelector, Keyframes,
        MediaQuery, Mixin, PseudoClasses, PseudoElements, SelectorContext, Selection, Style,
        StyleValue, Usable,
    };
    pub use crate::config::RenderOptions;
    pub use crate::context::{compile, compile_fn, Compilation, StyleModule};
}
