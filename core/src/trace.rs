//! Match trace types for debugging why a URL did (not) match.
//!
//! [`Template::match_with_trace`](crate::Template::match_with_trace) records
//! every decision the matcher takes. Unlike [`Template::matches`](crate::Template::matches),
//! a traced match does not stop at the first failing segment, so one run
//! shows every reason a URL was rejected.
//!
//! # Example
//!
//! ```
//! use teki::Template;
//!
//! let template = Template::compile("/user/:id<\\d+>").unwrap();
//! let trace = template.match_with_trace("http://h/user/abc");
//! assert!(trace.result.is_none());
//! for step in trace.failures() {
//!     println!("{step}");
//! }
//! ```

use crate::Params;
use std::fmt;

/// Which part of the URL a step refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// `/`-separated path segments.
    Path,
    /// `&`-separated query pairs.
    Query,
    /// The fragment after `#`.
    Hash,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Hash => "hash",
        })
    }
}

/// One decision taken while matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceStep {
    /// The candidate could not be parsed as a URL.
    InvalidUrl {
        /// The URL parser's message.
        reason: String,
    },
    /// The candidate path has a different number of segments than the template.
    ArityMismatch {
        /// Segments in the template.
        expected: usize,
        /// Segments in the candidate.
        actual: usize,
    },
    /// A template segment was tested against an observed value.
    Segment {
        /// Zone of the segment.
        zone: Zone,
        /// Index for path segments, key for query entries, empty for the hash.
        position: String,
        /// The template segment (e.g. `:id<\d+>`).
        segment: String,
        /// The decoded value found in the candidate.
        observed: String,
        /// Verdict for this segment.
        matched: bool,
    },
    /// A presence-only query key was found.
    KeyPresent {
        /// The query key.
        key: String,
    },
    /// A required query key is missing.
    MissingKey {
        /// The query key.
        key: String,
    },
    /// An optional query key is missing (not a failure).
    OptionalAbsent {
        /// The query key.
        key: String,
    },
}

impl TraceStep {
    /// Did this step cause the match to fail?
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            Self::InvalidUrl { .. } | Self::ArityMismatch { .. } | Self::MissingKey { .. } => true,
            Self::Segment { matched, .. } => !matched,
            Self::KeyPresent { .. } | Self::OptionalAbsent { .. } => false,
        }
    }
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { reason } => write!(f, "url: cannot parse ({reason})"),
            Self::ArityMismatch { expected, actual } => {
                write!(f, "path: expected {expected} segments, found {actual}")
            }
            Self::Segment {
                zone,
                position,
                segment,
                observed,
                matched,
            } => {
                let verdict = if *matched { "ok" } else { "rejected" };
                if position.is_empty() {
                    write!(f, "{zone}: {segment} vs \"{observed}\": {verdict}")
                } else {
                    write!(f, "{zone}[{position}]: {segment} vs \"{observed}\": {verdict}")
                }
            }
            Self::KeyPresent { key } => write!(f, "query[{key}]: present"),
            Self::MissingKey { key } => write!(f, "query[{key}]: required key missing"),
            Self::OptionalAbsent { key } => write!(f, "query[{key}]: optional key absent"),
        }
    }
}

/// Trace of a full match attempt.
///
/// # INV: `result` == `matches()` result
///
/// The `result` field always equals what [`Template::matches`](crate::Template::matches)
/// returns for the same URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTrace {
    /// The final result (identical to what `matches()` returns).
    pub result: Option<Params>,
    /// Every decision, in evaluation order: path, query, hash.
    pub steps: Vec<TraceStep>,
}

impl MatchTrace {
    /// Did the URL match?
    #[must_use]
    pub fn matched(&self) -> bool {
        self.result.is_some()
    }

    /// Steps that caused the match to fail.
    pub fn failures(&self) -> impl Iterator<Item = &TraceStep> {
        self.steps.iter().filter(|step| step.is_failure())
    }
}

/// Receives steps from the zone matchers.
///
/// Plain matching uses [`Silent`], which also lets matchers short-circuit;
/// tracing collects into a `Vec` and asks for exhaustive evaluation.
pub(crate) trait Observer {
    /// Keep evaluating after a failure?
    fn exhaustive(&self) -> bool;

    /// Record a step. The closure only runs when the step is kept.
    fn record(&mut self, step: impl FnOnce() -> TraceStep);
}

/// Observer that drops every step.
pub(crate) struct Silent;

impl Observer for Silent {
    fn exhaustive(&self) -> bool {
        false
    }

    fn record(&mut self, _step: impl FnOnce() -> TraceStep) {}
}

impl Observer for Vec<TraceStep> {
    fn exhaustive(&self) -> bool {
        true
    }

    fn record(&mut self, step: impl FnOnce() -> TraceStep) {
        self.push(step());
    }
}
