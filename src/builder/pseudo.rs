//! Pseudo-class and pseudo-element extension methods.
//!
//! Every method appends one pseudo token to each top-level selector group and
//! returns a new value; the receiver is never modified. The method tables are
//! generated from the name lists below, which are also exported as
//! [`PSEUDO_CLASSES`] and [`PSEUDO_ELEMENTS`].

use std::fmt;

use crate::selector::stringify::{join_groups, split_groups};
use crate::selector::Token;

// ---------------------------------------------------------------------------
// SelectorContext
// ---------------------------------------------------------------------------

/// A value carrying a selector token context that can be extended.
///
/// Implemented by [`Selection`](super::Selection) and [`Mixin`](super::Mixin).
/// All provided methods build a new value through
/// [`SelectorContext::with_tokens`].
pub trait SelectorContext: Sized {
    /// The current selector tokens.
    fn tokens(&self) -> &[Token];

    /// A copy of `self` over a different token sequence.
    fn with_tokens(&self, tokens: Vec<Token>) -> Self;

    /// Append `extra` to every top-level comma group.
    fn extend_groups(&self, extra: &[Token]) -> Self {
        let groups = split_groups(self.tokens());
        if groups.is_empty() {
            return self.with_tokens(extra.to_vec());
        }
        let extended = groups.into_iter().map(|group| {
            let mut group = group.to_vec();
            group.extend_from_slice(extra);
            group
        });
        self.with_tokens(join_groups(extended))
    }

    /// Append `:name` or `:name(argument)`.
    fn with_pseudo_class(&self, name: &str, argument: Option<String>) -> Self {
        self.extend_groups(&[Token::pseudo_class(name, argument)])
    }

    /// Append `::name` or `::name(argument)`.
    fn with_pseudo_element(&self, name: &str, argument: Option<String>) -> Self {
        self.extend_groups(&[Token::pseudo_element(name, argument)])
    }
}

// ---------------------------------------------------------------------------
// Method tables
// ---------------------------------------------------------------------------

macro_rules! pseudo_classes {
    (
        simple { $($method:ident => $css:literal,)* }
        functional { $($fmethod:ident => $fcss:literal,)* }
    ) => {
        /// CSS names of every pseudo-class exposed by [`PseudoClasses`].
        pub const PSEUDO_CLASSES: &[&str] = &[$($css,)* $($fcss,)*];

        /// Pseudo-class methods (`:hover`, `:nth-child(n)`, ...).
        pub trait PseudoClasses: SelectorContext {
            $(
                #[doc = concat!("Append `:", $css, "`.")]
                fn $method(&self) -> Self {
                    self.with_pseudo_class($css, None)
                }
            )*
            $(
                #[doc = concat!("Append `:", $fcss, "(argument)`.")]
                fn $fmethod(&self, argument: impl fmt::Display) -> Self {
                    self.with_pseudo_class($fcss, Some(argument.to_string()))
                }
            )*
        }

        impl<T: SelectorContext> PseudoClasses for T {}
    };
}

macro_rules! pseudo_elements {
    (
        simple { $($method:ident => $css:literal,)* }
        functional { $($fmethod:ident => $fcss:literal,)* }
    ) => {
        /// CSS names of every pseudo-element exposed by [`PseudoElements`].
        pub const PSEUDO_ELEMENTS: &[&str] = &[$($css,)* $($fcss,)*];

        /// Pseudo-element methods (`::before`, `::part(name)`, ...).
        pub trait PseudoElements: SelectorContext {
            $(
                #[doc = concat!("Append `::", $css, "`.")]
                fn $method(&self) -> Self {
                    self.with_pseudo_element($css, None)
                }
            )*
            $(
                #[doc = concat!("Append `::", $fcss, "(argument)`.")]
                fn $fmethod(&self, argument: impl fmt::Display) -> Self {
                    self.with_pseudo_element($fcss, Some(argument.to_string()))
                }
            )*
        }

        impl<T: SelectorContext> PseudoElements for T {}
    };
}

pseudo_classes! {
    simple {
        // user action
        hover => "hover",
        active => "active",
        focus => "focus",
        focus_visible => "focus-visible",
        focus_within => "focus-within",
        // location
        any_link => "any-link",
        link => "link",
        visited => "visited",
        local_link => "local-link",
        target => "target",
        target_within => "target-within",
        scope => "scope",
        // input
        enabled => "enabled",
        disabled => "disabled",
        read_only => "read-only",
        read_write => "read-write",
        placeholder_shown => "placeholder-shown",
        autofill => "autofill",
        default => "default",
        checked => "checked",
        indeterminate => "indeterminate",
        blank => "blank",
        valid => "valid",
        invalid => "invalid",
        in_range => "in-range",
        out_of_range => "out-of-range",
        required => "required",
        optional => "optional",
        user_valid => "user-valid",
        user_invalid => "user-invalid",
        // tree-structural
        root => "root",
        empty => "empty",
        first_child => "first-child",
        last_child => "last-child",
        only_child => "only-child",
        first_of_type => "first-of-type",
        last_of_type => "last-of-type",
        only_of_type => "only-of-type",
        // time-dimensional
        current => "current",
        past => "past",
        future => "future",
        // resource state
        playing => "playing",
        paused => "paused",
        seeking => "seeking",
        buffering => "buffering",
        stalled => "stalled",
        muted => "muted",
        volume_locked => "volume-locked",
        // element display state
        open => "open",
        closed => "closed",
        modal => "modal",
        fullscreen => "fullscreen",
        picture_in_picture => "picture-in-picture",
        popover_open => "popover-open",
        // shadow DOM
        defined => "defined",
        host => "host",
        // paged media
        first => "first",
        left => "left",
        right => "right",
    }
    functional {
        not => "not",
        is => "is",
        where_ => "where",
        has => "has",
        nth_child => "nth-child",
        nth_last_child => "nth-last-child",
        nth_of_type => "nth-of-type",
        nth_last_of_type => "nth-last-of-type",
        nth_col => "nth-col",
        nth_last_col => "nth-last-col",
        lang => "lang",
        dir => "dir",
        host_matching => "host",
        host_context => "host-context",
        state => "state",
    }
}

pseudo_elements! {
    simple {
        before => "before",
        after => "after",
        first_line => "first-line",
        first_letter => "first-letter",
        marker => "marker",
        placeholder => "placeholder",
        selection => "selection",
        backdrop => "backdrop",
        file_selector_button => "file-selector-button",
        spelling_error => "spelling-error",
        grammar_error => "grammar-error",
        target_text => "target-text",
        search_text => "search-text",
        details_content => "details-content",
        cue => "cue",
        column => "column",
        checkmark => "checkmark",
        picker_icon => "picker-icon",
        scroll_marker => "scroll-marker",
        scroll_marker_group => "scroll-marker-group",
        view_transition => "view-transition",
        webkit_scrollbar => "-webkit-scrollbar",
        webkit_scrollbar_thumb => "-webkit-scrollbar-thumb",
        webkit_scrollbar_track => "-webkit-scrollbar-track",
    }
    functional {
        part => "part",
        slotted => "slotted",
        highlight => "highlight",
        cue_matching => "cue",
        picker => "picker",
        view_transition_group => "view-transition-group",
        view_transition_image_pair => "view-transition-image-pair",
        view_transition_old => "view-transition-old",
        view_transition_new => "view-transition-new",
    }
}
