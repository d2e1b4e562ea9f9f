//! `style!` macro: parse CSS declarations at compile time and generate a `Style`.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{parenthesized, token, Error, Ident, LitFloat, LitInt, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// A single parsed CSS value component.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CssValue {
    /// A keyword like `red`, `space-between`, `--brand`.
    Ident(String),
    /// A unitless number, as written.
    Number(String),
    /// A number followed by `%`.
    Percent(String),
    /// A number followed by a unit, like `16px` or `0.2s`.
    Dimension(String, String),
    /// A hex color like `#1a1a2e`.
    Hash(String),
    /// A quoted string; the value is unquoted.
    Str(String),
    /// `name(args)`. An empty name is a bare parenthesized group.
    Function(String, Vec<CssValue>),
    Comma,
    Slash,
    /// A math operator inside `calc()` and friends.
    Operator(char),
}

impl CssValue {
    /// Whether this component can be the left operand of a math operator.
    fn is_operand(&self) -> bool {
        !matches!(self, CssValue::Comma | CssValue::Slash | CssValue::Operator(_))
    }
}

/// A single declaration: `property-name: value1 value2 [!important];`
#[derive(Debug, Clone)]
pub(crate) struct CssDeclaration {
    /// The property name as written (`font-size`, `--gap`).
    pub name: String,
    /// The span of the property name, for error reporting.
    pub name_span: Span,
    pub values: Vec<CssValue>,
    pub important: bool,
}

/// The top-level input to the style! macro.
#[derive(Debug)]
struct StyleInput {
    declarations: Vec<CssDeclaration>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Functions whose arguments are math expressions.
const MATH_FUNCTIONS: &[&str] = &["calc", "min", "max", "clamp"];

/// Units the Rust lexer cannot glue to a number (`1em` reads as an
/// exponent), accepted as a separate word: `1.5 em`.
const DETACHED_UNITS: &[&str] = &["em", "ex"];

impl Parse for StyleInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut declarations = Vec::new();
        while !input.is_empty() {
            declarations.push(parse_declaration(input)?);
        }
        Ok(StyleInput { declarations })
    }
}

/// Parse a dashed identifier: `-webkit-box`, `--brand`, `ease-in-out`.
fn parse_dashed_ident(input: ParseStream) -> Result<(String, Span)> {
    let mut name = String::new();
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        name.push('-');
    }
    let first = Ident::parse_any(input)?;
    name.push_str(&first.to_string());

    while input.peek(Token![-]) && (input.peek2(Ident::peek_any) || input.peek2(Token![-])) {
        input.parse::<Token![-]>()?;
        name.push('-');
        if input.peek(Ident::peek_any) {
            name.push_str(&Ident::parse_any(input)?.to_string());
        }
    }
    Ok((name, first.span()))
}

/// Parse a single declaration: `property-name: values [!important];`
pub(crate) fn parse_declaration(input: ParseStream) -> Result<CssDeclaration> {
    let (name, name_span) = parse_dashed_ident(input)?;
    input.parse::<Token![:]>()?;

    let mut values: Vec<CssValue> = Vec::new();
    while !input.is_empty() && !input.peek(Token![;]) && !input.peek(Token![!]) {
        let value = parse_css_value(input, false, values.last())?;
        values.push(value);
    }

    let mut important = false;
    if input.peek(Token![!]) {
        input.parse::<Token![!]>()?;
        let flag = Ident::parse_any(input)?;
        if flag != "important" {
            return Err(Error::new(flag.span(), format!("expected `important`, found `{flag}`")));
        }
        important = true;
    }

    if !input.is_empty() {
        input.parse::<Token![;]>()?;
    }

    if values.is_empty() {
        return Err(Error::new(name_span, format!("property `{name}` has no value")));
    }

    Ok(CssDeclaration {
        name,
        name_span,
        values,
        important,
    })
}

/// Parse the rest of a number literal: `%`, a glued suffix or a detached unit.
fn number_value(input: ParseStream, digits: String, suffix: &str) -> Result<CssValue> {
    if !suffix.is_empty() {
        return Ok(CssValue::Dimension(digits, suffix.to_string()));
    }
    if input.peek(Token![%]) {
        input.parse::<Token![%]>()?;
        return Ok(CssValue::Percent(digits));
    }
    if input.peek(Ident::peek_any) {
        let fork = input.fork();
        let unit = Ident::parse_any(&fork)?.to_string();
        if DETACHED_UNITS.contains(&unit.as_str()) {
            Ident::parse_any(input)?;
            return Ok(CssValue::Dimension(digits, unit));
        }
    }
    Ok(CssValue::Number(digits))
}

/// Parse a numeric literal, with an optional leading sign already consumed.
fn parse_number(input: ParseStream, sign: &str) -> Result<CssValue> {
    if input.peek(LitFloat) {
        let lit: LitFloat = input.parse()?;
        let digits = format!("{sign}{}", lit.base10_digits());
        return number_value(input, digits, lit.suffix());
    }
    let lit: LitInt = input.parse()?;
    let digits = format!("{sign}{}", lit.base10_digits());
    number_value(input, digits, lit.suffix())
}

/// Parse the arguments of a function or group.
fn parse_arguments(input: ParseStream, math: bool) -> Result<Vec<CssValue>> {
    let mut args: Vec<CssValue> = Vec::new();
    while !input.is_empty() {
        let value = parse_css_value(input, math, args.last())?;
        args.push(value);
    }
    Ok(args)
}

/// Parse a single CSS value component.
pub(crate) fn parse_css_value(
    input: ParseStream,
    math: bool,
    prev: Option<&CssValue>,
) -> Result<CssValue> {
    // Hash color: `#` followed by an identifier or a number-like literal
    // (`#1a1a2e` lexes as the integer `1` with suffix `a1a2e`).
    if input.peek(Token![#]) {
        input.parse::<Token![#]>()?;
        let hex = if input.peek(Ident::peek_any) {
            Ident::parse_any(input)?.to_string()
        } else if input.peek(LitInt) {
            input.parse::<LitInt>()?.to_string()
        } else if input.peek(LitFloat) {
            input.parse::<LitFloat>()?.to_string()
        } else {
            return Err(input.error("expected hex color value after `#`"));
        };
        return Ok(CssValue::Hash(format!("#{hex}")));
    }

    if input.peek(LitStr) {
        let lit: LitStr = input.parse()?;
        return Ok(CssValue::Str(lit.value()));
    }

    if input.peek(LitFloat) || input.peek(LitInt) {
        return parse_number(input, "");
    }

    if input.peek(token::Paren) {
        let content;
        parenthesized!(content in input);
        return Ok(CssValue::Function(String::new(), parse_arguments(&content, math)?));
    }

    if input.peek(Token![,]) {
        input.parse::<Token![,]>()?;
        return Ok(CssValue::Comma);
    }
    if input.peek(Token![/]) {
        input.parse::<Token![/]>()?;
        return Ok(CssValue::Slash);
    }
    if math && (input.peek(Token![+]) || input.peek(Token![*])) {
        let op = if input.peek(Token![+]) {
            input.parse::<Token![+]>()?;
            '+'
        } else {
            input.parse::<Token![*]>()?;
            '*'
        };
        return Ok(CssValue::Operator(op));
    }

    if input.peek(Token![-]) && !(input.peek2(Ident::peek_any) || input.peek2(Token![-])) {
        // Inside math functions a `-` after an operand is subtraction.
        if math && prev.is_some_and(CssValue::is_operand) {
            input.parse::<Token![-]>()?;
            return Ok(CssValue::Operator('-'));
        }
        let minus = input.parse::<Token![-]>()?;
        if input.peek(LitFloat) || input.peek(LitInt) {
            return parse_number(input, "-");
        }
        return Err(Error::new(minus.span, "expected a number after `-`"));
    }

    if input.peek(Ident::peek_any) || input.peek(Token![-]) {
        let (name, _) = parse_dashed_ident(input)?;
        if input.peek(token::Paren) {
            let content;
            parenthesized!(content in input);
            let math = math || MATH_FUNCTIONS.contains(&name.as_str());
            return Ok(CssValue::Function(name, parse_arguments(&content, math)?));
        }
        return Ok(CssValue::Ident(name));
    }

    Err(input.error("unexpected token in CSS value"))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render value components as CSS text.
///
/// Words are separated by single spaces; commas hug the left word, slashes
/// and math operators are spaced on both sides.
pub(crate) fn render_values(values: &[CssValue]) -> String {
    let mut out = String::new();
    for value in values {
        match value {
            CssValue::Comma => {
                out.push(',');
                continue;
            }
            CssValue::Slash => {
                out.push_str(" /");
                continue;
            }
            _ => {}
        }
        if !out.is_empty() && !out.ends_with('(') {
            out.push(' ');
        }
        match value {
            CssValue::Ident(word) | CssValue::Number(word) | CssValue::Hash(word) => {
                out.push_str(word);
            }
            CssValue::Percent(digits) => {
                out.push_str(digits);
                out.push('%');
            }
            CssValue::Dimension(digits, unit) => {
                out.push_str(digits);
                out.push_str(unit);
            }
            CssValue::Str(text) => {
                out.push('"');
                out.push_str(&text.replace('\\', "\\\\").replace('"', "\\\""));
                out.push('"');
            }
            CssValue::Function(name, args) => {
                out.push_str(name);
                out.push('(');
                out.push_str(&render_values(args));
                out.push(')');
            }
            CssValue::Operator(op) => out.push(*op),
            CssValue::Comma | CssValue::Slash => {}
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Generate code for one declaration: a `.set(name, value)` call.
fn generate_declaration(decl: &CssDeclaration) -> TokenStream {
    let name = &decl.name;
    let text = render_values(&decl.values);
    if decl.important {
        quote! { .set(#name, ::stylecraft::StyleValue::important(#text)) }
    } else {
        quote! { .set(#name, #text) }
    }
}

/// Entry point: generate code for the entire style! macro.
pub(crate) fn style_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: StyleInput = syn::parse2(input)?;

    if parsed.declarations.is_empty() {
        return Err(Error::new(
            Span::call_site(),
            "style! macro requires at least one property declaration",
        ));
    }

    let setters = parsed.declarations.iter().map(generate_declaration);

    Ok(quote! {
        ::stylecraft::Style::new() #(#setters)*
    })
}

// ===========================================================================
// Tests
// ===========================================================================
