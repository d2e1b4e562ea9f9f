//! Token model shared by the selector tokenizer, the at-rule tokenizer and the
//! stringifier.
//!
//! Every [`Token`] keeps the exact source slice it was scanned from in
//! [`Token::content`]; the [`TokenKind`] is a semantic projection of that slice.

use std::fmt;

/// A combinator joining two compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
    /// General sibling combinator: `A ~ B`.
    Sibling,
    /// Adjacent sibling combinator: `A + B`.
    Adjacent,
}

impl Combinator {
    /// The bare source symbol (`" "` for descendant).
    pub fn symbol(self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => ">",
            Combinator::Sibling => "~",
            Combinator::Adjacent => "+",
        }
    }
}

/// Attribute matcher operator: `=`, `~=`, `|=`, `^=`, `$=`, `*=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

impl AttributeOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            AttributeOperator::Equals => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        }
    }

    pub(crate) fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => AttributeOperator::Equals,
            "~=" => AttributeOperator::Includes,
            "|=" => AttributeOperator::DashMatch,
            "^=" => AttributeOperator::Prefix,
            "$=" => AttributeOperator::Suffix,
            "*=" => AttributeOperator::Substring,
            _ => return None,
        })
    }
}

/// The parsed parts of an attribute selector like `[svg|href^="#" i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// Namespace prefix before `|`, if any (may be empty for `[|name]`).
    pub namespace: Option<String>,
    pub name: String,
    pub operator: Option<AttributeOperator>,
    /// Matched value with surrounding quotes removed.
    pub value: Option<String>,
    /// Trailing case-sensitivity flag: `i`, `I`, `s` or `S`.
    pub case_flag: Option<char>,
}

impl AttributeSelector {
    /// Presence selector: `[name]`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
            operator: None,
            value: None,
            case_flag: None,
        }
    }

    /// Set the operator and value (builder).
    pub fn with_value(mut self, operator: AttributeOperator, value: impl Into<String>) -> Self {
        self.operator = Some(operator);
        self.value = Some(value.into());
        self
    }

    /// Set the namespace prefix (builder).
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the case-sensitivity flag (builder).
    pub fn with_case_flag(mut self, flag: char) -> Self {
        self.case_flag = Some(flag);
        self
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if let Some(ns) = &self.namespace {
            write!(f, "{ns}|")?;
        }
        f.write_str(&self.name)?;
        if let (Some(op), Some(value)) = (self.operator, &self.value) {
            write!(f, "{}\"{}\"", op.symbol(), value.replace('"', "\\\""))?;
        }
        if let Some(flag) = self.case_flag {
            write!(f, " {flag}")?;
        }
        f.write_str("]")
    }
}

/// Comparison and logical operators inside an at-rule prelude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Not,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Eq => "=",
        }
    }
}

/// Semantic projection of a token's source text.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Selector tokens ──────────────────────────────────────────────
    /// Top-level `,` separating selector groups.
    Comma,
    Combinator(Combinator),
    /// `#name`.
    Id { name: String },
    /// `.name`.
    Class { name: String },
    /// `:name` or `:name(argument)`.
    PseudoClass {
        name: String,
        argument: Option<String>,
    },
    /// `::name` or `::name(argument)`.
    PseudoElement {
        name: String,
        argument: Option<String>,
    },
    /// `*`, `ns|*`.
    Universal { namespace: Option<String> },
    /// `[...]`.
    Attribute(AttributeSelector),
    /// Tag name, optionally `ns|tag`.
    Type {
        name: String,
        namespace: Option<String>,
    },
    /// The `&` nesting selector.
    Nesting,

    // ── At-rule prelude tokens ───────────────────────────────────────
    /// `@name`; `name` excludes the `@`.
    AtRuleName { name: String },
    Identifier { name: String },
    /// `name(arguments)` with the raw argument text.
    Function { name: String, arguments: String },
    /// Quoted string; `value` keeps its quotes.
    String { value: String },
    Number { value: f64 },
    Dimension { value: f64, unit: String },
    Percentage { value: f64 },
    Operator(Operator),
    /// Structural character: `(`, `)`, `,`, `:`, `/`.
    Delimiter(char),
}

/// A single scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The original source substring, verbatim.
    pub content: String,
}

impl Token {
    /// Pair a kind with its source text.
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn comma() -> Self {
        Self::new(TokenKind::Comma, ",")
    }

    pub fn combinator(combinator: Combinator) -> Self {
        Self::new(TokenKind::Combinator(combinator), combinator.symbol())
    }

    pub fn id(name: impl Into<String>) -> Self {
        let name = name.into();
        let content = format!("#{name}");
        Self::new(TokenKind::Id { name }, content)
    }

    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        let content = format!(".{name}");
        Self::new(TokenKind::Class { name }, content)
    }

    pub fn pseudo_class(name: impl Into<String>, argument: Option<String>) -> Self {
        let name = name.into();
        let content = match &argument {
            Some(arg) => format!(":{name}({arg})"),
            None => format!(":{name}"),
        };
        Self::new(TokenKind::PseudoClass { name, argument }, content)
    }

    pub fn pseudo_element(name: impl Into<String>, argument: Option<String>) -> Self {
        let name = name.into();
        let content = match &argument {
            Some(arg) => format!("::{name}({arg})"),
            None => format!("::{name}"),
        };
        Self::new(TokenKind::PseudoElement { name, argument }, content)
    }

    pub fn universal() -> Self {
        Self::new(TokenKind::Universal { namespace: None }, "*")
    }

    pub fn type_selector(name: impl Into<String>) -> Self {
        let name = name.into();
        let content = name.clone();
        Self::new(
            TokenKind::Type {
                name,
                namespace: None,
            },
            content,
        )
    }

    pub fn attribute(attribute: AttributeSelector) -> Self {
        let content = attribute.to_string();
        Self::new(TokenKind::Attribute(attribute), content)
    }

    pub fn nesting() -> Self {
        Self::new(TokenKind::Nesting, "&")
    }

    pub fn at_rule_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let content = format!("@{name}");
        Self::new(TokenKind::AtRuleName { name }, content)
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        let name = name.into();
        let content = name.clone();
        Self::new(TokenKind::Identifier { name }, content)
    }

    pub fn function(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        let name = name.into();
        let arguments = arguments.into();
        let content = format!("{name}({arguments})");
        Self::new(TokenKind::Function { name, arguments }, content)
    }

    pub fn number(value: f64) -> Self {
        Self::new(TokenKind::Number { value }, format_number(value))
    }

    pub fn dimension(value: f64, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        let content = format!("{}{unit}", format_number(value));
        Self::new(TokenKind::Dimension { value, unit }, content)
    }

    pub fn percentage(value: f64) -> Self {
        Self::new(
            TokenKind::Percentage { value },
            format!("{}%", format_number(value)),
        )
    }

    pub fn operator(operator: Operator) -> Self {
        Self::new(TokenKind::Operator(operator), operator.symbol())
    }

    pub fn delimiter(ch: char) -> Self {
        Self::new(TokenKind::Delimiter(ch), ch.to_string())
    }

    /// Returns `true` for a top-level selector comma.
    pub fn is_comma(&self) -> bool {
        matches!(self.kind, TokenKind::Comma)
    }

    /// Returns `true` for any combinator, descendant included.
    pub fn is_combinator(&self) -> bool {
        matches!(self.kind, TokenKind::Combinator(_))
    }

    /// Returns `true` if this token belongs to an at-rule prelude rather than
    /// a selector.
    pub fn is_prelude(&self) -> bool {
        self.kind.is_prelude()
    }
}

impl TokenKind {
    /// Returns `true` for at-rule prelude kinds.
    pub fn is_prelude(&self) -> bool {
        match self {
            TokenKind::AtRuleName { .. }
            | TokenKind::Identifier { .. }
            | TokenKind::Function { .. }
            | TokenKind::String { .. }
            | TokenKind::Number { .. }
            | TokenKind::Dimension { .. }
            | TokenKind::Percentage { .. }
            | TokenKind::Operator(_)
            | TokenKind::Delimiter(_) => true,
            TokenKind::Comma
            | TokenKind::Combinator(_)
            | TokenKind::Id { .. }
            | TokenKind::Class { .. }
            | TokenKind::PseudoClass { .. }
            | TokenKind::PseudoElement { .. }
            | TokenKind::Universal { .. }
            | TokenKind::Attribute(_)
            | TokenKind::Type { .. }
            | TokenKind::Nesting => false,
        }
    }
}

/// Format a number the way it is written in CSS: integral values without a
/// fractional part, everything else with the shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinator_symbols() {
        assert_eq!(Token::combinator(Combinator::Descendant).content, " ");
        assert_eq!(Token::combinator(Combinator::Child).content, ">");
        assert_eq!(Token::combinator(Combinator::Sibling).content, "~");
        assert_eq!(Token::combinator(Combinator::Adjacent).content, "+");
    }

    #[test]
    fn pseudo_class_content_embeds_argument() {
        let token = Token::pseudo_class("nth-child", Some("2n+1".into()));
        assert_eq!(token.content, ":nth-child(2n+1)");
        assert_eq!(
            token.kind,
            TokenKind::PseudoClass {
                name: "nth-child".into(),
                argument: Some("2n+1".into()),
            }
        );
    }

    #[test]
    fn pseudo_element_content() {
        assert_eq!(Token::pseudo_element("after", None).content, "::after");
        assert_eq!(
            Token::pseudo_element("part", Some("label".into())).content,
            "::part(label)"
        );
    }

    #[test]
    fn attribute_display() {
        let attr = AttributeSelector::new("href")
            .with_value(AttributeOperator::Prefix, "https")
            .with_case_flag('i');
        assert_eq!(Token::attribute(attr).content, "[href^=\"https\" i]");

        let presence = AttributeSelector::new("disabled");
        assert_eq!(presence.to_string(), "[disabled]");

        let namespaced = AttributeSelector::new("href").with_namespace("xlink");
        assert_eq!(namespaced.to_string(), "[xlink|href]");
    }

    #[test]
    fn attribute_operator_symbols_roundtrip() {
        for op in [
            AttributeOperator::Equals,
            AttributeOperator::Includes,
            AttributeOperator::DashMatch,
            AttributeOperator::Prefix,
            AttributeOperator::Suffix,
            AttributeOperator::Substring,
        ] {
            assert_eq!(AttributeOperator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(AttributeOperator::from_symbol("!="), None);
    }

    #[test]
    fn numeric_tokens() {
        assert_eq!(Token::number(3.0).content, "3");
        assert_eq!(Token::dimension(1.5, "rem").content, "1.5rem");
        assert_eq!(Token::percentage(50.0).content, "50%");
        assert_eq!(Token::dimension(-2.0, "px").content, "-2px");
    }

    #[test]
    fn prelude_classification() {
        assert!(Token::at_rule_name("media").is_prelude());
        assert!(Token::delimiter('(').is_prelude());
        assert!(!Token::class("a").is_prelude());
        assert!(!Token::comma().is_prelude());
        assert!(Token::comma().is_comma());
        assert!(Token::combinator(Combinator::Child).is_combinator());
    }

    #[test]
    fn format_number_integral_and_fractional() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-3.5), "-3.5");
    }
}
