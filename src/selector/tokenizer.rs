//! logos-based selector tokenizer.
//!
//! Scanning happens in two passes. The raw [`Lexeme`] lexer recognises the
//! simple selectors, combinator symbols and commas, skipping whitespace; logos
//! callbacks swallow balanced `(...)` and `[...]` groups so that commas and
//! combinators inside them never surface as separators. The assembly pass then
//! turns lexemes into [`Token`]s and uses byte spans to tell a compound
//! selector (`a.b`) from a descendant relationship (`a .b`).
//!
//! Token priority follows the usual logos rules:
//! - `:is(` with its balanced argument beats the bare pseudo `:is`
//! - `svg|rect` as a namespaced type beats `svg` followed by garbage
//! - `*|*` as a namespaced universal beats `*`

use std::ops::Range;

use logos::{Lexer, Logos};

use crate::selector::token::{AttributeOperator, AttributeSelector, Combinator, Token, TokenKind};

/// Errors from selector and at-rule tokenization.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenizeError {
    #[error("unbalanced '{delimiter}' at byte {position}")]
    UnbalancedDelimiter { delimiter: char, position: usize },
    #[error("unterminated string starting at byte {position}")]
    UnterminatedString { position: usize },
    #[error("dangling combinator at byte {position}")]
    DanglingCombinator { position: usize },
    #[error("empty selector in list at byte {position}")]
    EmptyGroup { position: usize },
    #[error("unexpected character '{ch}' at byte {position}")]
    UnexpectedCharacter { ch: char, position: usize },
    #[error("at-rule must start with '@' followed by a name")]
    MissingAtKeyword,
}

/// Failure reported by a lexer callback (or by logos for unmatched input).
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum LexFailure {
    #[default]
    Unrecognized,
    Unclosed(char),
    UnterminatedString,
}

impl LexFailure {
    /// Attach a position to the failure, using the span logos reported.
    pub(crate) fn into_error(self, input: &str, span: &Range<usize>) -> TokenizeError {
        match self {
            LexFailure::Unclosed(delimiter) => {
                // The opener is the last byte of the matched prefix.
                let position = input[..span.end]
                    .rfind(delimiter)
                    .unwrap_or(span.start);
                TokenizeError::UnbalancedDelimiter {
                    delimiter,
                    position,
                }
            }
            LexFailure::UnterminatedString => TokenizeError::UnterminatedString {
                position: span.start,
            },
            LexFailure::Unrecognized => {
                let ch = input[span.start..].chars().next().unwrap_or('\0');
                match ch {
                    '(' | ')' | '[' | ']' => TokenizeError::UnbalancedDelimiter {
                        delimiter: ch,
                        position: span.start,
                    },
                    '"' | '\'' => TokenizeError::UnterminatedString {
                        position: span.start,
                    },
                    _ => TokenizeError::UnexpectedCharacter {
                        ch,
                        position: span.start,
                    },
                }
            }
        }
    }
}

/// Find the byte index of the `close` that balances an already consumed
/// `open`, skipping quoted strings and backslash escapes.
pub(crate) fn scan_balanced(rest: &str, open: char, close: char) -> Result<usize, LexFailure> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in rest.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    if quote.is_some() {
        Err(LexFailure::UnterminatedString)
    } else {
        Err(LexFailure::Unclosed(open))
    }
}

fn balanced_parens(lex: &mut Lexer<Lexeme>) -> Result<(), LexFailure> {
    let end = scan_balanced(lex.remainder(), '(', ')')?;
    lex.bump(end + 1);
    Ok(())
}

fn attribute_block(lex: &mut Lexer<Lexeme>) -> Result<(), LexFailure> {
    let end = scan_balanced(lex.remainder(), '[', ']')?;
    lex.bump(end + 1);
    Ok(())
}

/// Raw selector lexeme. Identifiers accept backslash escapes and non-ASCII.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexFailure)]
#[logos(skip r"[ \t\n\r\f]+")]
enum Lexeme {
    /// `:name(` or `::name(` plus the balanced argument and `)`.
    #[regex(r"::?(-|--)?([a-zA-Z_]|[^\x00-\x7F])([a-zA-Z0-9_-]|[^\x00-\x7F])*\(", balanced_parens)]
    FunctionalPseudo,

    /// `:name` or `::name`.
    #[regex(r"::?(-|--)?([a-zA-Z_]|[^\x00-\x7F])([a-zA-Z0-9_-]|[^\x00-\x7F])*")]
    Pseudo,

    /// `#name`.
    #[regex(r"#([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\f])+")]
    Id,

    /// `.name`.
    #[regex(r"\.(-|--)?([a-zA-Z_]|[^\x00-\x7F]|\\[^\r\n\f])([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\f])*")]
    Class,

    /// `[` plus everything up to the balancing `]`.
    #[token("[", attribute_block)]
    Attribute,

    /// `ns|tag`, `*|tag`, `|tag`.
    #[regex(r"(([a-zA-Z_]|[^\x00-\x7F])([a-zA-Z0-9_-]|[^\x00-\x7F])*|\*)?\|([a-zA-Z_]|[^\x00-\x7F])([a-zA-Z0-9_-]|[^\x00-\x7F])*")]
    NamespacedType,

    /// `ns|*`, `*|*`, `|*`.
    #[regex(r"(([a-zA-Z_]|[^\x00-\x7F])([a-zA-Z0-9_-]|[^\x00-\x7F])*|\*)?\|\*")]
    NamespacedUniversal,

    /// Bare tag name.
    #[regex(r"(-|--)?([a-zA-Z_]|[^\x00-\x7F]|\\[^\r\n\f])([a-zA-Z0-9_-]|[^\x00-\x7F]|\\[^\r\n\f])*")]
    Type,

    #[token("*")]
    Universal,

    #[token("&")]
    Nesting,

    #[token(",")]
    Comma,

    #[token(">")]
    Child,

    #[token("+")]
    Adjacent,

    #[token("~")]
    Sibling,
}

/// Tokenize a CSS selector list into an ordered token sequence.
///
/// Whitespace between two compound selectors becomes a descendant combinator
/// token with content `" "`; whitespace around `,`, `>`, `+` and `~` produces
/// no token. An empty (or all-whitespace) input yields an empty vector.
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut prev_end: Option<usize> = None;

    for (result, span) in Lexeme::lexer(input).spanned() {
        let lexeme = result.map_err(|failure| failure.into_error(input, &span))?;
        let text = &input[span.clone()];
        let separated = prev_end.is_some_and(|end| end < span.start);
        prev_end = Some(span.end);

        match lexeme {
            Lexeme::Comma => {
                reject_dangling(&tokens, span.start)?;
                if tokens.last().is_none_or(Token::is_comma) {
                    return Err(TokenizeError::EmptyGroup {
                        position: span.start,
                    });
                }
                tokens.push(Token::new(TokenKind::Comma, text));
            }
            Lexeme::Child | Lexeme::Adjacent | Lexeme::Sibling => {
                if tokens.last().is_some_and(Token::is_combinator) {
                    return Err(TokenizeError::DanglingCombinator {
                        position: span.start,
                    });
                }
                let combinator = match lexeme {
                    Lexeme::Child => Combinator::Child,
                    Lexeme::Adjacent => Combinator::Adjacent,
                    _ => Combinator::Sibling,
                };
                tokens.push(Token::new(TokenKind::Combinator(combinator), text));
            }
            _ => {
                let continues_compound = tokens
                    .last()
                    .is_some_and(|t| !t.is_comma() && !t.is_combinator());
                if separated && continues_compound {
                    tokens.push(Token::combinator(Combinator::Descendant));
                }
                tokens.push(simple_selector(lexeme, text, span.start)?);
            }
        }
    }

    reject_dangling(&tokens, input.len())?;
    if tokens.last().is_some_and(Token::is_comma) {
        return Err(TokenizeError::EmptyGroup {
            position: input.len(),
        });
    }
    Ok(tokens)
}

/// A selector group may not end on an explicit combinator.
fn reject_dangling(tokens: &[Token], position: usize) -> Result<(), TokenizeError> {
    if tokens.last().is_some_and(Token::is_combinator) {
        return Err(TokenizeError::DanglingCombinator { position });
    }
    Ok(())
}

/// Build the token for a single simple-selector lexeme.
fn simple_selector(lexeme: Lexeme, text: &str, offset: usize) -> Result<Token, TokenizeError> {
    let kind = match lexeme {
        Lexeme::Id => TokenKind::Id {
            name: text[1..].to_string(),
        },
        Lexeme::Class => TokenKind::Class {
            name: text[1..].to_string(),
        },
        Lexeme::Pseudo | Lexeme::FunctionalPseudo => pseudo(text),
        Lexeme::Attribute => {
            let inner = &text[1..text.len() - 1];
            TokenKind::Attribute(parse_attribute(inner, offset + 1)?)
        }
        Lexeme::NamespacedType => {
            let (namespace, name) = text.split_once('|').unwrap_or(("", text));
            TokenKind::Type {
                name: name.to_string(),
                namespace: Some(namespace.to_string()),
            }
        }
        Lexeme::NamespacedUniversal => {
            let namespace = text.split_once('|').map_or("", |(ns, _)| ns);
            TokenKind::Universal {
                namespace: Some(namespace.to_string()),
            }
        }
        Lexeme::Type => TokenKind::Type {
            name: text.to_string(),
            namespace: None,
        },
        Lexeme::Universal => TokenKind::Universal { namespace: None },
        Lexeme::Nesting => TokenKind::Nesting,
        Lexeme::Comma | Lexeme::Child | Lexeme::Adjacent | Lexeme::Sibling => {
            return Err(TokenizeError::UnexpectedCharacter {
                ch: text.chars().next().unwrap_or('\0'),
                position: offset,
            })
        }
    };
    Ok(Token::new(kind, text))
}

/// Split `:name(arg)` / `::name` into a pseudo-class or pseudo-element kind.
fn pseudo(text: &str) -> TokenKind {
    let (is_element, body) = match text.strip_prefix("::") {
        Some(body) => (true, body),
        None => (false, &text[1..]),
    };
    let (name, argument) = match body.find('(') {
        Some(open) => (
            body[..open].to_string(),
            Some(body[open + 1..body.len() - 1].to_string()),
        ),
        None => (body.to_string(), None),
    };
    if is_element {
        TokenKind::PseudoElement { name, argument }
    } else {
        TokenKind::PseudoClass { name, argument }
    }
}

/// Parse the inside of `[...]`. `offset` is the byte position of `inner` in
/// the original input, used for error reporting.
fn parse_attribute(inner: &str, offset: usize) -> Result<AttributeSelector, TokenizeError> {
    let unexpected = |rest: &str| {
        let ch = rest.chars().next().unwrap_or(']');
        TokenizeError::UnexpectedCharacter {
            ch,
            position: offset + (inner.len() - rest.len()),
        }
    };

    let trimmed = inner.trim_start();

    // Namespace: a `|` that is not part of the `|=` operator.
    let (namespace, rest) = match namespace_bar(trimmed) {
        Some(bar) => (Some(trimmed[..bar].to_string()), &trimmed[bar + 1..]),
        None => (None, trimmed),
    };

    let name_end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '\\'))
        .unwrap_or(rest.len());
    if name_end == 0 {
        return Err(unexpected(rest));
    }
    let mut attribute = AttributeSelector {
        namespace,
        name: rest[..name_end].to_string(),
        operator: None,
        value: None,
        case_flag: None,
    };

    let rest = rest[name_end..].trim_start();
    if rest.is_empty() {
        return Ok(attribute);
    }

    let op_len = if rest.starts_with('=') { 1 } else { 2 };
    let operator = rest
        .get(..op_len)
        .and_then(AttributeOperator::from_symbol)
        .ok_or_else(|| unexpected(rest))?;
    attribute.operator = Some(operator);

    let rest = rest[op_len..].trim_start();
    let (value, rest) = match rest.chars().next() {
        Some(q @ ('"' | '\'')) => {
            let close = closing_quote(&rest[1..], q).ok_or(TokenizeError::UnterminatedString {
                position: offset + (inner.len() - rest.len()),
            })?;
            (&rest[1..close + 1], &rest[close + 2..])
        }
        Some(_) => {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (&rest[..end], &rest[end..])
        }
        None => return Err(unexpected(rest)),
    };
    attribute.value = Some(value.to_string());

    let rest = rest.trim();
    match rest {
        "" => {}
        "i" | "I" | "s" | "S" => attribute.case_flag = rest.chars().next(),
        _ => return Err(unexpected(rest)),
    }

    Ok(attribute)
}

/// Byte index of a namespace separator `|` that precedes the attribute name.
fn namespace_bar(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'|' => return (bytes.get(i + 1) != Some(&b'=')).then_some(i),
            b'*' if i == 0 => continue,
            b'=' | b'~' | b'^' | b'$' | b'*' | b']' => return None,
            b if b.is_ascii_whitespace() => return None,
            _ => {}
        }
    }
    None
}

/// Index (in `s`) of the quote closing a string whose opening quote was
/// already consumed.
fn closing_quote(s: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::stringify::stringify_dense;

    /// Helper: tokenize and return just the token kinds.
    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap_or_else(|e| panic!("tokenize failed: {e}"))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    /// Helper: tokenize and return each token's content.
    fn contents(input: &str) -> Vec<String> {
        tokenize(input)
            .unwrap_or_else(|e| panic!("tokenize failed: {e}"))
            .into_iter()
            .map(|t| t.content)
            .collect()
    }

    fn type_kind(name: &str) -> TokenKind {
        TokenKind::Type {
            name: name.into(),
            namespace: None,
        }
    }

    // ── Simple selectors ─────────────────────────────────────────────

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t\n ").unwrap().is_empty());
    }

    #[test]
    fn test_class_and_id() {
        assert_eq!(
            kinds(".button#main"),
            vec![
                TokenKind::Class {
                    name: "button".into()
                },
                TokenKind::Id {
                    name: "main".into()
                },
            ]
        );
    }

    #[test]
    fn test_universal() {
        assert_eq!(kinds("*"), vec![TokenKind::Universal { namespace: None }]);
    }

    #[test]
    fn test_nesting_selector() {
        assert_eq!(
            kinds("&:hover"),
            vec![
                TokenKind::Nesting,
                TokenKind::PseudoClass {
                    name: "hover".into(),
                    argument: None
                },
            ]
        );
    }

    #[test]
    fn test_type_with_namespace() {
        assert_eq!(
            kinds("svg|rect"),
            vec![TokenKind::Type {
                name: "rect".into(),
                namespace: Some("svg".into())
            }]
        );
        assert_eq!(
            kinds("*|*"),
            vec![TokenKind::Universal {
                namespace: Some("*".into())
            }]
        );
    }

    // ── Combinators ──────────────────────────────────────────────────

    #[test]
    fn test_child_combinator_scenario() {
        let tokens = tokenize("div > span").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::new(type_kind("div"), "div"));
        assert_eq!(
            tokens[1],
            Token::new(TokenKind::Combinator(Combinator::Child), ">")
        );
        assert_eq!(tokens[2], Token::new(type_kind("span"), "span"));
    }

    #[test]
    fn test_descendant_whitespace_collapses() {
        assert_eq!(contents("nav   \n  a"), vec!["nav", " ", "a"]);
        assert_eq!(
            kinds("nav a")[1],
            TokenKind::Combinator(Combinator::Descendant)
        );
    }

    #[test]
    fn test_all_explicit_combinators() {
        assert_eq!(contents("a+b~c>d"), vec!["a", "+", "b", "~", "c", ">", "d"]);
        assert_eq!(
            contents("a  +  b ~ c > d"),
            vec!["a", "+", "b", "~", "c", ">", "d"]
        );
    }

    #[test]
    fn test_leading_combinator_is_relative() {
        assert_eq!(contents("> .icon"), vec![">", ".icon"]);
    }

    #[test]
    fn test_comma_list() {
        assert_eq!(contents("h1, h2 ,h3"), vec!["h1", ",", "h2", ",", "h3"]);
    }

    // ── Pseudo-classes and pseudo-elements ───────────────────────────

    #[test]
    fn test_pseudo_only_selector() {
        assert_eq!(
            kinds(":hover"),
            vec![TokenKind::PseudoClass {
                name: "hover".into(),
                argument: None
            }]
        );
    }

    #[test]
    fn test_pseudo_element() {
        assert_eq!(
            kinds(".btn::after"),
            vec![
                TokenKind::Class { name: "btn".into() },
                TokenKind::PseudoElement {
                    name: "after".into(),
                    argument: None
                },
            ]
        );
    }

    #[test]
    fn test_vendor_pseudo_element() {
        assert_eq!(
            kinds("::-webkit-scrollbar"),
            vec![TokenKind::PseudoElement {
                name: "-webkit-scrollbar".into(),
                argument: None
            }]
        );
    }

    #[test]
    fn test_functional_pseudo_with_nested_parens() {
        let tokens = tokenize("li:is(.a, :not(.b)) > a").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].content, ":is(.a, :not(.b))");
        assert_eq!(
            tokens[1].kind,
            TokenKind::PseudoClass {
                name: "is".into(),
                argument: Some(".a, :not(.b)".into())
            }
        );
    }

    #[test]
    fn test_nth_child_argument_with_plus() {
        let tokens = tokenize("tr:nth-child(2n + 1)").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].content, ":nth-child(2n + 1)");
    }

    // ── Attributes ───────────────────────────────────────────────────

    #[test]
    fn test_attribute_presence() {
        assert_eq!(
            kinds("[disabled]"),
            vec![TokenKind::Attribute(AttributeSelector::new("disabled"))]
        );
    }

    #[test]
    fn test_attribute_operator_value_flag() {
        let tokens = tokenize("a[href$=\".pdf\" i]").unwrap();
        assert_eq!(tokens[1].content, "[href$=\".pdf\" i]");
        assert_eq!(
            tokens[1].kind,
            TokenKind::Attribute(
                AttributeSelector::new("href")
                    .with_value(AttributeOperator::Suffix, ".pdf")
                    .with_case_flag('i')
            )
        );
    }

    #[test]
    fn test_attribute_bare_value_and_dash_match() {
        assert_eq!(
            kinds("[lang|=en]"),
            vec![TokenKind::Attribute(
                AttributeSelector::new("lang").with_value(AttributeOperator::DashMatch, "en")
            )]
        );
    }

    #[test]
    fn test_attribute_namespace() {
        assert_eq!(
            kinds("[xlink|href]"),
            vec![TokenKind::Attribute(
                AttributeSelector::new("href").with_namespace("xlink")
            )]
        );
    }

    #[test]
    fn test_attribute_value_hides_separators() {
        // Commas and combinator symbols inside the value are not top-level.
        let tokens = tokenize("[data-x=\"a, b > c\"]").unwrap();
        assert_eq!(tokens.len(), 1);
    }

    // ── Escapes ──────────────────────────────────────────────────────

    #[test]
    fn test_escaped_colon_in_class() {
        assert_eq!(
            kinds(r".md\:flex"),
            vec![TokenKind::Class {
                name: r"md\:flex".into()
            }]
        );
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn test_unclosed_paren() {
        assert_eq!(
            tokenize(":not(.a").unwrap_err(),
            TokenizeError::UnbalancedDelimiter {
                delimiter: '(',
                position: 4
            }
        );
    }

    #[test]
    fn test_unclosed_bracket() {
        assert_eq!(
            tokenize("a[href").unwrap_err(),
            TokenizeError::UnbalancedDelimiter {
                delimiter: '[',
                position: 1
            }
        );
    }

    #[test]
    fn test_stray_closer() {
        assert_eq!(
            tokenize(".a)").unwrap_err(),
            TokenizeError::UnbalancedDelimiter {
                delimiter: ')',
                position: 2
            }
        );
    }

    #[test]
    fn test_trailing_combinator() {
        assert!(matches!(
            tokenize("div >").unwrap_err(),
            TokenizeError::DanglingCombinator { .. }
        ));
    }

    #[test]
    fn test_double_combinator() {
        assert!(matches!(
            tokenize("a > + b").unwrap_err(),
            TokenizeError::DanglingCombinator { .. }
        ));
    }

    #[test]
    fn test_combinator_before_comma() {
        assert!(matches!(
            tokenize("a >, b").unwrap_err(),
            TokenizeError::DanglingCombinator { .. }
        ));
    }

    #[test]
    fn test_empty_groups_in_list() {
        assert_eq!(
            tokenize("a,").unwrap_err(),
            TokenizeError::EmptyGroup { position: 2 }
        );
        assert_eq!(
            tokenize(",a").unwrap_err(),
            TokenizeError::EmptyGroup { position: 0 }
        );
        assert_eq!(
            tokenize("a,,b").unwrap_err(),
            TokenizeError::EmptyGroup { position: 2 }
        );
        assert_eq!(
            tokenize("a , ").unwrap_err(),
            TokenizeError::EmptyGroup { position: 4 }
        );
    }

    #[test]
    fn test_bad_attribute_operator() {
        assert!(matches!(
            tokenize("[a!=b]").unwrap_err(),
            TokenizeError::UnexpectedCharacter { ch: '!', .. }
        ));
    }

    // ── Dense round trip ─────────────────────────────────────────────

    #[test]
    fn test_dense_round_trip_on_canonical_input() {
        for input in [
            ".button",
            "div>span",
            "ul li a",
            "h1,h2",
            "a:not(.b, .c)::before",
            "input[type=\"checkbox\" i]:checked+label",
            "svg|circle~*",
        ] {
            assert_eq!(stringify_dense(&tokenize(input).unwrap()), input);
        }
    }
}
