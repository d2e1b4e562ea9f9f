//! Selector and at-rule tokenizers, the shared token model, and the stringifier.

pub mod token;
pub mod tokenizer;
pub mod at_rule;
pub mod stringify;

pub use at_rule::tokenize_at_rule;
pub use stringify::{stringify, stringify_dense};
pub use token::{AttributeOperator, AttributeSelector, Combinator, Operator, Token, TokenKind};
pub use tokenizer::{tokenize, TokenizeError};
