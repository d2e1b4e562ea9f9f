//! Render configuration for CSS output.

// ---------------------------------------------------------------------------
// RenderOptions
// ---------------------------------------------------------------------------

/// Default indentation unit: four spaces.
pub const DEFAULT_INDENT: &str = "    ";

/// Options controlling how the AST is rendered to CSS text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Indentation unit repeated once per nesting level.
    pub indent: String,
    /// Whether declarations end with `;`.
    pub semicolon: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            semicolon: true,
        }
    }
}

impl RenderOptions {
    /// Create the default options (four-space indent, semicolons on).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation unit (builder).
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Toggle trailing semicolons (builder).
    pub fn with_semicolon(mut self, semicolon: bool) -> Self {
        self.semicolon = semicolon;
        self
    }

    /// The indentation prefix for a given nesting depth.
    pub(crate) fn pad(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }
}
