//! Render token sequences back to selector or at-rule text.
//!
//! [`stringify_dense`] is the exact inverse of tokenization (content
//! concatenation). [`stringify`] normalizes whitespace:
//!
//! ```text
//! div>span , a  ~  b      =>  div > span, a ~ b
//! @media screen  and (min-width:768px)  =>  @media screen and (min-width: 768px)
//! ```

use crate::selector::token::{Combinator, Token, TokenKind};

/// Concatenate every token's source content, unmodified.
pub fn stringify_dense(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.content.as_str()).collect()
}

/// Render tokens with canonical spacing.
///
/// Selector tokens: explicit combinators get one space on each side, the
/// descendant combinator is a single space and commas render as `", "`.
/// At-rule tokens: words are separated by one space, parentheses hug their
/// contents, and `:`/`,` attach to the token on their left.
pub fn stringify(tokens: &[Token]) -> String {
    let mut out = String::new();

    for (i, token) in tokens.iter().enumerate() {
        match &token.kind {
            TokenKind::Comma => out.push_str(", "),
            TokenKind::Combinator(Combinator::Descendant) => out.push(' '),
            TokenKind::Combinator(combinator) => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                out.push_str(combinator.symbol());
                out.push(' ');
            }
            TokenKind::AtRuleName { .. }
            | TokenKind::Identifier { .. }
            | TokenKind::Function { .. }
            | TokenKind::String { .. }
            | TokenKind::Number { .. }
            | TokenKind::Dimension { .. }
            | TokenKind::Percentage { .. }
            | TokenKind::Operator(_)
            | TokenKind::Delimiter(_) => {
                let prev = i.checked_sub(1).map(|p| &tokens[p].kind);
                let before_prev = i.checked_sub(2).map(|p| &tokens[p].kind);
                if let Some(prev) = prev {
                    if prelude_space(prev, &token.kind, before_prev) {
                        out.push(' ');
                    }
                }
                out.push_str(&token.content);
            }
            TokenKind::Id { .. }
            | TokenKind::Class { .. }
            | TokenKind::PseudoClass { .. }
            | TokenKind::PseudoElement { .. }
            | TokenKind::Universal { .. }
            | TokenKind::Attribute(_)
            | TokenKind::Type { .. }
            | TokenKind::Nesting => out.push_str(&token.content),
        }
    }

    out
}

/// Whether a space separates two adjacent at-rule prelude tokens.
fn prelude_space(prev: &TokenKind, next: &TokenKind, before_prev: Option<&TokenKind>) -> bool {
    match (prev, next) {
        (TokenKind::Delimiter('('), _) | (TokenKind::Delimiter('/'), _) => false,
        (_, TokenKind::Delimiter(')' | ',' | '/')) => false,
        // `@page :first`
        (TokenKind::AtRuleName { .. }, TokenKind::Delimiter(':')) => true,
        (_, TokenKind::Delimiter(':')) => false,
        (TokenKind::Delimiter(':'), _) => {
            !matches!(before_prev, Some(TokenKind::AtRuleName { .. }))
        }
        _ => prev.is_prelude(),
    }
}

/// Split a selector list on its top-level commas.
///
/// An empty token slice has no groups.
pub fn split_groups(tokens: &[Token]) -> Vec<&[Token]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    tokens.split(Token::is_comma).collect()
}

/// Join selector groups back into one token sequence with comma tokens.
pub fn join_groups<I>(groups: I) -> Vec<Token>
where
    I: IntoIterator<Item = Vec<Token>>,
{
    let mut out = Vec::new();
    for group in groups {
        if !out.is_empty() {
            out.push(Token::comma());
        }
        out.extend(group);
    }
    out
}
