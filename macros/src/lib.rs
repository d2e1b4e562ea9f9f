//! Proc macros for stylecraft: `style!` inline declaration blocks.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `stylecraft`.

use proc_macro::TokenStream;

mod style_macro;

/// Compile-time CSS declaration macro.
///
/// Parses CSS property declarations at compile time and produces a
/// `stylecraft::Style` with one entry per declaration, in order.
///
/// # Syntax
///
/// ```ignore
/// let card = style! {
///     display: flex;
///     box-sizing: border-box;
///     padding: 4px 8px;
///     background: #1a1a2e;
///     font-family: "Inter", sans-serif;
///     width: calc(100% - 2rem);
///     color: var(--brand, red) !important;
///     --gap: 8px;
/// };
/// ```
///
/// Property names are kebab-case, vendor-prefixed (`-webkit-...`) or custom
/// (`--name`). Strings are emitted quoted. Units starting with `e` cannot
/// follow a digit in Rust source, so write `1.5 em` or use a string.
#[proc_macro]
pub fn style(input: TokenStream) -> TokenStream {
    style_macro::style_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
