//! logos-based at-rule prelude tokenizer.
//!
//! Scans `@name prelude` strings such as `@media screen and (min-width: 768px)`
//! or `@container sidebar (width >= 400px)` into a flat token stream. Logical
//! composition (`and`/`or`/`not`) is kept lexical; no condition tree is built.
//!
//! Numeric lookahead is encoded in the regexes: `-` followed by a digit starts
//! a number, `-` followed by a letter starts an identifier.

use logos::{Lexer, Logos};

use crate::selector::token::{Operator, Token, TokenKind};
use crate::selector::tokenizer::{scan_balanced, LexFailure, TokenizeError};

/// Units that turn `<number><unit>` into a dimension token.
const KNOWN_UNITS: &[&str] = &[
    // Absolute and font-relative lengths
    "px", "cm", "mm", "q", "in", "pt", "pc", "em", "rem", "ex", "rex", "cap", "rcap", "ch",
    "rch", "ic", "ric", "lh", "rlh",
    // Viewport lengths
    "vw", "vh", "vi", "vb", "vmin", "vmax", "svw", "svh", "svi", "svb", "svmin", "svmax", "lvw",
    "lvh", "lvi", "lvb", "lvmin", "lvmax", "dvw", "dvh", "dvi", "dvb", "dvmin", "dvmax",
    // Container query lengths
    "cqw", "cqh", "cqi", "cqb", "cqmin", "cqmax",
    // Angles, time, frequency
    "deg", "grad", "rad", "turn", "s", "ms", "hz", "khz",
    // Resolution and flex
    "dpi", "dpcm", "dppx", "x", "fr",
];

fn is_known_unit(unit: &str) -> bool {
    KNOWN_UNITS.iter().any(|u| u.eq_ignore_ascii_case(unit))
}

fn function_arguments(lex: &mut Lexer<PreludeLexeme>) -> Result<(), LexFailure> {
    let end = scan_balanced(lex.remainder(), '(', ')')?;
    lex.bump(end + 1);
    Ok(())
}

/// Raw at-rule prelude lexeme.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexFailure)]
#[logos(skip r"[ \t\n\r\f]+")]
enum PreludeLexeme {
    #[regex(r"@(-|--)?[a-zA-Z_][a-zA-Z0-9_-]*")]
    AtKeyword,

    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)%")]
    Percentage,

    /// Number with an alphabetic suffix; the suffix is checked against
    /// [`KNOWN_UNITS`] during assembly.
    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)[a-zA-Z]+")]
    Dimension,

    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)")]
    Number,

    /// Identifier immediately followed by a balanced `(...)`.
    #[regex(r"(-|--)?[a-zA-Z_][a-zA-Z0-9_-]*\(", function_arguments)]
    Function,

    #[regex(r"(-|--)?[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    SingleQuoted,

    #[token(">=")]
    Ge,

    #[token("<=")]
    Le,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("=")]
    Eq,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("/")]
    Slash,
}

/// Tokenize an at-rule prelude. The input must start with `@name`; the first
/// token is always [`TokenKind::AtRuleName`].
pub fn tokenize_at_rule(input: &str) -> Result<Vec<Token>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut open_parens: Vec<usize> = Vec::new();

    for (result, span) in PreludeLexeme::lexer(input).spanned() {
        let lexeme = result.map_err(|failure| failure.into_error(input, &span))?;
        let text = &input[span.clone()];

        if tokens.is_empty() && lexeme != PreludeLexeme::AtKeyword {
            return Err(TokenizeError::MissingAtKeyword);
        }

        match lexeme {
            PreludeLexeme::AtKeyword => {
                if !tokens.is_empty() {
                    return Err(TokenizeError::UnexpectedCharacter {
                        ch: '@',
                        position: span.start,
                    });
                }
                tokens.push(Token::new(
                    TokenKind::AtRuleName {
                        name: text[1..].to_string(),
                    },
                    text,
                ));
            }
            PreludeLexeme::Percentage => {
                let value = parse_number(&text[..text.len() - 1], span.start)?;
                tokens.push(Token::new(TokenKind::Percentage { value }, text));
            }
            PreludeLexeme::Dimension => {
                let unit_start = text
                    .find(|c: char| c.is_ascii_alphabetic())
                    .unwrap_or(text.len());
                let (number, unit) = text.split_at(unit_start);
                let value = parse_number(number, span.start)?;
                if is_known_unit(unit) {
                    tokens.push(Token::new(
                        TokenKind::Dimension {
                            value,
                            unit: unit.to_string(),
                        },
                        text,
                    ));
                } else {
                    tokens.push(Token::new(TokenKind::Number { value }, number));
                    tokens.push(Token::new(
                        TokenKind::Identifier {
                            name: unit.to_string(),
                        },
                        unit,
                    ));
                }
            }
            PreludeLexeme::Number => {
                let value = parse_number(text, span.start)?;
                tokens.push(Token::new(TokenKind::Number { value }, text));
            }
            PreludeLexeme::Function => {
                let open = text.find('(').unwrap_or(text.len());
                tokens.push(Token::new(
                    TokenKind::Function {
                        name: text[..open].to_string(),
                        arguments: text[open + 1..text.len() - 1].to_string(),
                    },
                    text,
                ));
            }
            PreludeLexeme::Ident => {
                let kind = match text.to_ascii_lowercase().as_str() {
                    "and" => TokenKind::Operator(Operator::And),
                    "or" => TokenKind::Operator(Operator::Or),
                    "not" => TokenKind::Operator(Operator::Not),
                    _ => TokenKind::Identifier {
                        name: text.to_string(),
                    },
                };
                tokens.push(Token::new(kind, text));
            }
            PreludeLexeme::DoubleQuoted | PreludeLexeme::SingleQuoted => {
                tokens.push(Token::new(
                    TokenKind::String {
                        value: text.to_string(),
                    },
                    text,
                ));
            }
            PreludeLexeme::Ge => tokens.push(Token::new(TokenKind::Operator(Operator::Ge), text)),
            PreludeLexeme::Le => tokens.push(Token::new(TokenKind::Operator(Operator::Le), text)),
            PreludeLexeme::Gt => tokens.push(Token::new(TokenKind::Operator(Operator::Gt), text)),
            PreludeLexeme::Lt => tokens.push(Token::new(TokenKind::Operator(Operator::Lt), text)),
            PreludeLexeme::Eq => tokens.push(Token::new(TokenKind::Operator(Operator::Eq), text)),
            PreludeLexeme::ParenOpen => {
                open_parens.push(span.start);
                tokens.push(Token::new(TokenKind::Delimiter('('), text));
            }
            PreludeLexeme::ParenClose => {
                if open_parens.pop().is_none() {
                    return Err(TokenizeError::UnbalancedDelimiter {
                        delimiter: ')',
                        position: span.start,
                    });
                }
                tokens.push(Token::new(TokenKind::Delimiter(')'), text));
            }
            PreludeLexeme::Colon => tokens.push(Token::new(TokenKind::Delimiter(':'), text)),
            PreludeLexeme::Comma => tokens.push(Token::new(TokenKind::Delimiter(','), text)),
            PreludeLexeme::Slash => tokens.push(Token::new(TokenKind::Delimiter('/'), text)),
        }
    }

    if tokens.is_empty() {
        return Err(TokenizeError::MissingAtKeyword);
    }
    if let Some(position) = open_parens.pop() {
        return Err(TokenizeError::UnbalancedDelimiter {
            delimiter: '(',
            position,
        });
    }

    Ok(tokens)
}

fn parse_number(text: &str, position: usize) -> Result<f64, TokenizeError> {
    text.parse().map_err(|_| TokenizeError::UnexpectedCharacter {
        ch: text.chars().next().unwrap_or('\0'),
        position,
    })
}
