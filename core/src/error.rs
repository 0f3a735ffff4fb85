//! Error types.
//!
//! Two tiers, kept apart on purpose by the API:
//!
//! - [`TemplateError`]: the template itself is malformed. Raised by
//!   [`Template::compile`](crate::Template::compile), never while matching.
//! - [`ReverseError`]: the parameter dictionary handed to a reverser is
//!   incomplete, holds a path value no URL can carry, or names an unknown
//!   route.
//!
//! A URL that simply does not match a template is not an error: matching
//! returns `None`.

/// Errors from template compilation.
///
/// These are template-authoring mistakes. Fix the template and compile again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The template as a whole is malformed (e.g. no leading `/`).
    #[error("invalid template \"{template}\": {reason}")]
    InvalidTemplate {
        /// The offending template.
        template: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// One segment of the template is malformed (e.g. a capture without a name).
    #[error("invalid segment \"{segment}\": {reason}")]
    InvalidSegment {
        /// The offending segment, decoded.
        segment: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A `<` constraint is not closed by a `>` ending the segment.
    #[error("no closing '>' for the constraint in segment \"{segment}\"")]
    UnclosedConstraint {
        /// The offending segment, decoded.
        segment: String,
    },

    /// A constraint is not a valid regular expression.
    #[error("invalid constraint <{pattern}>: {message}")]
    InvalidConstraint {
        /// The constraint text between `<` and `>`.
        pattern: String,
        /// The regex engine's message.
        message: String,
    },

    /// The template or one of its constraints exceeds the allowed length.
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length in bytes.
        len: usize,
        /// Maximum allowed length in bytes.
        max: usize,
    },
}

/// Errors from reversing a template into a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReverseError {
    /// A required capture has no value in the dictionary.
    #[error("missing parameter \"{name}\"")]
    MissingParameter {
        /// Name of the capture.
        name: String,
    },

    /// A path value would not survive URL normalization (`.`, `..`, or an
    /// empty last segment), so the URL would not match its own template.
    #[error("parameter \"{name}\" cannot be written as a path segment: \"{value}\"")]
    UnrepresentablePathValue {
        /// Name of the capture.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// A [`RouteTable`](crate::RouteTable) has no route with this name.
    #[error("unknown route \"{name}\"{}", format_available(.available))]
    UnknownRoute {
        /// The requested route name.
        name: String,
        /// Route names that ARE registered (for self-correcting error messages).
        available: Vec<String>,
    },
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        " (no routes are registered)".to_string()
    } else {
        format!(" (registered: {})", available.join(", "))
    }
}

/// Errors from building a [`RouteTable`](crate::RouteTable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A route's template failed to compile.
    #[error("route \"{route}\": {source}")]
    Template {
        /// Name of the route.
        route: String,
        /// The compile error.
        #[source]
        source: TemplateError,
    },

    /// Two routes share a name.
    #[error("route \"{name}\" is defined more than once")]
    DuplicateRoute {
        /// The repeated name.
        name: String,
    },

    /// Too many routes in a single table.
    #[error("route table has {count} routes, but maximum allowed is {max}")]
    TooManyRoutes {
        /// Actual count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}
