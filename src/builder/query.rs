//! Typed media and container query condition builders.
//!
//! Both builders render to prelude text through `Display`, so they can be
//! passed anywhere a query string is accepted:
//!
//! ```
//! use stylecraft::builder::{ContainerQuery, MediaQuery};
//!
//! let wide = MediaQuery::screen().min_width("768px");
//! assert_eq!(wide.to_string(), "screen and (min-width: 768px)");
//!
//! let card = ContainerQuery::named("card").min_width("30em");
//! assert_eq!(card.to_string(), "card (min-width: 30em)");
//! ```

use std::fmt;

/// `(name: value)`.
fn feature(name: &str, value: impl fmt::Display) -> String {
    format!("({name}: {value})")
}

// ---------------------------------------------------------------------------
// MediaQuery
// ---------------------------------------------------------------------------

/// A media query list built from typed calls.
///
/// Features are joined with `and`; [`MediaQuery::or`] appends another query
/// to the comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaQuery {
    modifier: Option<&'static str>,
    media_type: Option<String>,
    features: Vec<String>,
    alternatives: Vec<MediaQuery>,
}

macro_rules! media_features {
    ($($method:ident => $css:literal,)*) => {
        $(
            #[doc = concat!("And `(", $css, ": value)`.")]
            pub fn $method(self, value: impl fmt::Display) -> Self {
                self.feature($css, value)
            }
        )*
    };
}

impl MediaQuery {
    /// An empty query; add features to it.
    pub fn new() -> Self {
        Self::default()
    }

    /// A query for the given media type.
    pub fn media_type(media_type: impl Into<String>) -> Self {
        Self {
            media_type: Some(media_type.into()),
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self::media_type("all")
    }

    pub fn screen() -> Self {
        Self::media_type("screen")
    }

    pub fn print() -> Self {
        Self::media_type("print")
    }

    /// Prefix the media type with `only`. Without a media type the query
    /// is scoped to `all`.
    pub fn only(mut self) -> Self {
        self.modifier = Some("only");
        self
    }

    /// Negate the query: `not print`, or `not all and (...)` when no media
    /// type was given.
    pub fn not(mut self) -> Self {
        self.modifier = Some("not");
        self
    }

    /// And an arbitrary `(name: value)` feature.
    pub fn feature(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.features.push(feature(name, value));
        self
    }

    /// And a raw condition, e.g. `(hover)` or `(400px <= width <= 700px)`.
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.features.push(condition.into());
        self
    }

    media_features! {
        width => "width",
        min_width => "min-width",
        max_width => "max-width",
        height => "height",
        min_height => "min-height",
        max_height => "max-height",
        aspect_ratio => "aspect-ratio",
        min_aspect_ratio => "min-aspect-ratio",
        max_aspect_ratio => "max-aspect-ratio",
        orientation => "orientation",
        resolution => "resolution",
        min_resolution => "min-resolution",
        max_resolution => "max-resolution",
        hover => "hover",
        any_hover => "any-hover",
        pointer => "pointer",
        any_pointer => "any-pointer",
        display_mode => "display-mode",
        color_gamut => "color-gamut",
        prefers_color_scheme => "prefers-color-scheme",
        prefers_reduced_motion => "prefers-reduced-motion",
        prefers_contrast => "prefers-contrast",
        forced_colors => "forced-colors",
    }

    /// Append `other` to the comma-separated query list.
    pub fn or(mut self, other: MediaQuery) -> Self {
        let MediaQuery {
            modifier,
            media_type,
            features,
            alternatives,
        } = other;
        self.alternatives.push(MediaQuery {
            modifier,
            media_type,
            features,
            alternatives: Vec::new(),
        });
        self.alternatives.extend(alternatives);
        self
    }

    fn fmt_single(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote = false;
        // A modifier always needs a media type to bind to.
        let media_type = match (&self.media_type, self.modifier) {
            (Some(media_type), _) => Some(media_type.as_str()),
            (None, Some(_)) => Some("all"),
            (None, None) => None,
        };
        if let Some(media_type) = media_type {
            if let Some(modifier) = self.modifier {
                write!(f, "{modifier} ")?;
            }
            f.write_str(media_type)?;
            wrote = true;
        }
        for feature in &self.features {
            if wrote {
                f.write_str(" and ")?;
            }
            f.write_str(feature)?;
            wrote = true;
        }
        Ok(())
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_single(f)?;
        for alternative in &self.alternatives {
            f.write_str(", ")?;
            alternative.fmt_single(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ContainerQuery
// ---------------------------------------------------------------------------

/// A container query condition, optionally scoped to a named container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerQuery {
    name: Option<String>,
    conditions: Vec<String>,
}

macro_rules! container_features {
    ($($method:ident => $css:literal,)*) => {
        $(
            #[doc = concat!("And `(", $css, ": value)`.")]
            pub fn $method(self, value: impl fmt::Display) -> Self {
                self.feature($css, value)
            }
        )*
    };
}

impl ContainerQuery {
    /// A query against the nearest container.
    pub fn new() -> Self {
        Self::default()
    }

    /// A query against the container with this `container-name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            conditions: Vec::new(),
        }
    }

    /// And an arbitrary `(name: value)` size feature.
    pub fn feature(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.conditions.push(feature(name, value));
        self
    }

    /// And a raw condition, e.g. `(width >= 30em)`.
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    container_features! {
        width => "width",
        min_width => "min-width",
        max_width => "max-width",
        height => "height",
        min_height => "min-height",
        max_height => "max-height",
        inline_size => "inline-size",
        min_inline_size => "min-inline-size",
        max_inline_size => "max-inline-size",
        block_size => "block-size",
        aspect_ratio => "aspect-ratio",
        orientation => "orientation",
    }

    /// And a style query: `style(--name: value)`.
    pub fn style(mut self, property: &str, value: impl fmt::Display) -> Self {
        self.conditions.push(format!("style({property}: {value})"));
        self
    }

    /// Negate the conditions gathered so far: `not (...)`. A query with no
    /// conditions is left unchanged.
    pub fn not(mut self) -> Self {
        if self.conditions.is_empty() {
            return self;
        }
        let inner = self.grouped();
        self.conditions = vec![format!("not {inner}")];
        self
    }

    /// Either the conditions gathered so far or those of `other`.
    ///
    /// The name of `self` is kept; `other`'s name is ignored.
    pub fn or(mut self, other: ContainerQuery) -> Self {
        if other.conditions.is_empty() {
            return self;
        }
        if self.conditions.is_empty() {
            self.conditions = other.conditions;
            return self;
        }
        let left = self.grouped();
        let right = other.grouped();
        self.conditions = vec![format!("{left} or {right}")];
        self
    }

    /// The conditions as one parenthesized unit.
    fn grouped(&self) -> String {
        match self.conditions.as_slice() {
            [single] if single.starts_with('(') => single.clone(),
            _ => format!("({})", self.conditions.join(" and ")),
        }
    }
}

impl fmt::Display for ContainerQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(name)?;
            if !self.conditions.is_empty() {
                f.write_str(" ")?;
            }
        }
        f.write_str(&self.conditions.join(" and "))
    }
}
