//! teki - URL route templates: compile once, match and reverse many
//!
//! A template such as `/user/:id<\d+>?tab?=:tab#:anchor` compiles into a
//! matcher that extracts named parameters from concrete URLs and a reverser
//! that rebuilds URLs from parameters.
//!
//! # Architecture
//!
//! Compilation runs in three passes:
//!
//! 1. **Shield**: [`shield_constraints`] percent-encodes every `<...>` body so
//!    regex characters are not mistaken for URL structure.
//! 2. **Split**: the template is cut into zones (`#` first, then `?`), then
//!    into atoms (`/` for the path, `&` and `=` for the query).
//! 3. **Compile**: each atom is decoded and compiled into a [`Segment`].
//!
//! | Zone | Compiled to | Semantics |
//! |------|-------------|-----------|
//! | path | [`PathMatcher`] | positional, exact arity |
//! | query | [`QueryMatcher`] | keyed, optional keys, extra keys ignored |
//! | hash | [`HashMatcher`] | a single segment |
//!
//! # Key Design Insights
//!
//! 1. **One compiled form**: a [`Segment`] both matches a candidate and renders
//!    a value, so [`Template::matches`] and [`Template::reverse`] cannot drift.
//!
//! 2. **No match is not an error**: matching returns `Option<Params>`. Only a
//!    malformed template ([`TemplateError`]) or an incomplete dictionary
//!    ([`ReverseError`]) is an error.
//!
//! 3. **Linear-time constraints**: constraints use the `regex` crate, so a
//!    hostile URL cannot trigger catastrophic backtracking.
//!
//! # Example
//!
//! ```
//! use teki::prelude::*;
//!
//! let template = Template::compile("/user/:id<\\d+>?tab?=:tab").unwrap();
//!
//! // Match
//! let params = template.matches("https://example.com/user/42?tab=posts").unwrap();
//! assert_eq!(params.get("id"), Some("42"));
//! assert_eq!(params.get("tab"), Some("posts"));
//! assert!(template.matches("https://example.com/user/bob").is_none());
//!
//! // Reverse
//! let url = template.reverse(&Params::new().with("id", "7")).unwrap();
//! assert_eq!(url, "/user/7");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod constraint;
mod error;
mod escape;
mod hash;
mod params;
mod path;
mod query;
mod segment;
mod table;
mod template;
mod trace;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use constraint::Constraint;
pub use params::Params;
pub use segment::{Capture, Placement, Segment, SegmentMatch};
pub use template::Template;

// Zone matchers
pub use hash::HashMatcher;
pub use path::PathMatcher;
pub use query::{QueryEntry, QueryMatcher};

// Route table
pub use table::{RouteConfig, RouteMatch, RouteTable, RouteTableConfig};

// Trace types
pub use trace::{MatchTrace, TraceStep, Zone};

// Errors
pub use error::{ReverseError, TableError, TemplateError};

// Encoding helpers
pub use escape::{decode, shield_constraints};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use teki::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Trace types
        MatchTrace,
        // Core types
        Params,
        // Errors
        ReverseError,
        // Route table
        RouteMatch,
        RouteTable,
        TableError,
        Template,
        TemplateError,
        TraceStep,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length of a template, in bytes.
pub const MAX_TEMPLATE_LENGTH: usize = 8192;

/// Maximum length of a single `<...>` constraint, in bytes.
///
/// Shorter than [`MAX_TEMPLATE_LENGTH`] because regex compilation cost grows
/// faster than literal matching.
pub const MAX_CONSTRAINT_LENGTH: usize = 4096;

/// Maximum number of routes in a single [`RouteTable`].
///
/// Resolution is a linear scan, so an unbounded table is a width-based
/// denial-of-service.
pub const MAX_ROUTES: usize = 1024;
