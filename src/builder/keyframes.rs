//! `@keyframes` animation handles.

use std::fmt;

use super::style::Style;
use super::BuildError;

/// A registered `@keyframes` animation.
///
/// Displays as the animation name so it can be used as an `animation-name`
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    name: String,
    steps: Vec<(String, Style)>,
}

impl Keyframes {
    pub(crate) fn new(name: &str) -> Result<Self, BuildError> {
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(BuildError::InvalidName {
                kind: "keyframes",
                name: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            steps: Vec::new(),
        })
    }

    pub(crate) fn push_step(&mut self, offset: impl Into<String>, style: Style) {
        self.steps.push((offset.into(), style));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recorded steps (`from`, `50%`, `to`, ...) in order.
    pub fn steps(&self) -> &[(String, Style)] {
        &self.steps
    }
}

impl fmt::Display for Keyframes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation() {
        assert!(Keyframes::new("fade-in").is_ok());
        assert!(matches!(
            Keyframes::new("  "),
            Err(BuildError::InvalidName { kind: "keyframes", .. })
        ));
        assert!(Keyframes::new("two words").is_err());
    }

    #[test]
    fn displays_name() {
        let mut spin = Keyframes::new("spin").unwrap();
        spin.push_step("to", Style::new().set("transform", "rotate(360deg)"));
        assert_eq!(spin.to_string(), "spin");
        assert_eq!(spin.steps().len(), 1);
        assert_eq!(spin.steps()[0].0, "to");
    }
}
