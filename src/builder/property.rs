//! Custom property references and `@property` registrations.

use std::fmt;

use super::style::StyleValue;
use super::BuildError;

/// A reference to a CSS custom property.
///
/// Displays as `var(--name)`, or `var(--name, fallback)` when a fallback is
/// set, so it can be used directly as a [`StyleValue`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomProperty {
    name: String,
    fallback: Option<String>,
}

impl CustomProperty {
    /// Create a reference. Leading dashes in `name` are optional.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim_start_matches('-').to_string(),
            fallback: None,
        }
    }

    /// Like [`CustomProperty::new`], rejecting empty names.
    pub(crate) fn parse(name: &str) -> Result<Self, BuildError> {
        let property = Self::new(name);
        if property.name.trim().is_empty() {
            return Err(BuildError::InvalidName {
                kind: "custom property",
                name: name.to_string(),
            });
        }
        Ok(property)
    }

    /// Set the `var()` fallback (builder).
    pub fn with_fallback(mut self, fallback: impl Into<StyleValue>) -> Self {
        self.fallback = fallback.into().to_css();
        self
    }

    /// The declared name, with its `--` prefix.
    pub fn name(&self) -> String {
        format!("--{}", self.name)
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }
}

impl fmt::Display for CustomProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fallback {
            Some(fallback) => write!(f, "var(--{}, {fallback})", self.name),
            None => write!(f, "var(--{})", self.name),
        }
    }
}

/// Quote a `@property` syntax descriptor unless it already is.
pub(crate) fn quote_syntax(syntax: &str) -> String {
    let trimmed = syntax.trim();
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        trimmed.to_string()
    } else {
        format!("\"{trimmed}\"")
    }
}
