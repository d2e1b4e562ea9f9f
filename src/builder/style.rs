//! Style bundles: ordered property maps with typed values.
//!
//! A [`Style`] is a reusable value. Keys are stored already converted to CSS
//! property names (`backgroundColor` becomes `background-color`), values are
//! [`StyleValue`]s that know how to render themselves.

use std::fmt;

use crate::ast::Declaration;
use crate::selector::token::format_number;

use super::keyframes::Keyframes;
use super::property::CustomProperty;

// ---------------------------------------------------------------------------
// StyleValue
// ---------------------------------------------------------------------------

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// Raw CSS text, emitted unchanged.
    Text(String),
    /// A bare number, printed without a trailing `.0` when integral.
    Number(f64),
    /// A custom property reference, printed as `var(--name)`.
    Var(CustomProperty),
    /// The wrapped value with `!important`.
    Important(Box<StyleValue>),
    /// No value: the property is skipped.
    Absent,
}

impl StyleValue {
    /// Mark a value `!important`.
    pub fn important(value: impl Into<StyleValue>) -> Self {
        match value.into() {
            StyleValue::Absent => StyleValue::Absent,
            already @ StyleValue::Important(_) => already,
            other => StyleValue::Important(Box::new(other)),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, StyleValue::Absent)
    }

    pub fn is_important(&self) -> bool {
        matches!(self, StyleValue::Important(_))
    }

    /// The rendered value text, or `None` for [`StyleValue::Absent`].
    ///
    /// The `!important` marker is not part of the text; see
    /// [`StyleValue::is_important`].
    pub fn to_css(&self) -> Option<String> {
        match self {
            StyleValue::Text(text) => Some(text.clone()),
            StyleValue::Number(n) => Some(format_number(*n)),
            StyleValue::Var(var) => Some(var.to_string()),
            StyleValue::Important(inner) => inner.to_css(),
            StyleValue::Absent => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_css() {
            Some(text) if self.is_important() => write!(f, "{text} !important"),
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<&String> for StyleValue {
    fn from(value: &String) -> Self {
        StyleValue::Text(value.clone())
    }
}

macro_rules! number_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StyleValue {
                fn from(value: $ty) -> Self {
                    StyleValue::Number(f64::from(value))
                }
            }
        )*
    };
}

number_value!(f64, f32, i32, u32, i16, u16, i8, u8);

impl From<CustomProperty> for StyleValue {
    fn from(value: CustomProperty) -> Self {
        StyleValue::Var(value)
    }
}

impl From<&CustomProperty> for StyleValue {
    fn from(value: &CustomProperty) -> Self {
        StyleValue::Var(value.clone())
    }
}

impl From<&Keyframes> for StyleValue {
    fn from(value: &Keyframes) -> Self {
        StyleValue::Text(value.name().to_string())
    }
}

impl<T: Into<StyleValue>> From<Option<T>> for StyleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StyleValue::Absent, Into::into)
    }
}

/// Shorthand for [`StyleValue::important`].
pub fn important(value: impl Into<StyleValue>) -> StyleValue {
    StyleValue::important(value)
}

// ---------------------------------------------------------------------------
// Property names
// ---------------------------------------------------------------------------

/// Convert a camelCase property key to its kebab-case CSS name.
///
/// Custom properties (`--brand`) and names without uppercase letters are
/// returned unchanged. A leading capital or a leading `ms` before a capital
/// marks a vendor prefix: `WebkitTransition` becomes `-webkit-transition`,
/// `msFlex` becomes `-ms-flex`.
pub fn to_kebab_case(key: &str) -> String {
    if key.starts_with("--") || !key.chars().any(|c| c.is_ascii_uppercase()) {
        return key.to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    let vendor_ms = key.starts_with("ms") && key[2..].starts_with(|c: char| c.is_ascii_uppercase());
    if vendor_ms {
        out.push('-');
    }
    // A capital at position zero is a vendor prefix (Webkit, Moz) and gets
    // the same leading dash as any other word break.
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// An ordered set of property declarations.
///
/// Setting a property that is already present replaces its value in place,
/// keeping the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    entries: Vec<(String, StyleValue)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property (builder). The key may be camelCase or kebab-case.
    pub fn set(mut self, key: &str, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a property in place.
    pub fn insert(&mut self, key: &str, value: impl Into<StyleValue>) {
        let prop = to_kebab_case(key);
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == prop) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((prop, value)),
        }
    }

    /// Merge another bundle into this one; its values win.
    pub fn merge(mut self, other: &Style) -> Self {
        for (prop, value) in &other.entries {
            self.insert(prop, value.clone());
        }
        self
    }

    pub fn get(&self, prop: &str) -> Option<&StyleValue> {
        let prop = to_kebab_case(prop);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == prop)
            .map(|(_, value)| value)
    }

    /// Entries in insertion order, absent values included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(prop, value)| (prop.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The AST declarations for this bundle, skipping absent values.
    pub fn declarations(&self) -> Vec<Declaration> {
        self.entries
            .iter()
            .filter_map(|(prop, value)| {
                value
                    .to_css()
                    .map(|text| Declaration::new(prop.clone(), text).important(value.is_important()))
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Style
where
    K: AsRef<str>,
    V: Into<StyleValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Style::new();
        style.extend(iter);
        style
    }
}

impl<K, V> Extend<(K, V)> for Style
where
    K: AsRef<str>,
    V: Into<StyleValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Style
where
    K: AsRef<str>,
    V: Into<StyleValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl From<&Style> for Style {
    fn from(style: &Style) -> Self {
        style.clone()
    }
}
