//! Segment compiler: one template atom.
//!
//! An atom is one `/`-delimited path unit, the value of one `key=value` query
//! pair, or the fragment. It compiles to a [`Segment`]:
//!
//! | Atom | Segment |
//! |------|---------|
//! | `users` | `Literal("users")` |
//! | `:id` | capture `id` |
//! | `:id<\d+>` | capture `id`, constrained |
//! | `:page?` / `:page?<\d+>` | optional capture (query values only) |
//!
//! A segment both matches a candidate value and renders a value from a
//! parameter dictionary, so matcher and reverser share one compiled form.

use crate::escape::decode;
use crate::{Constraint, Params, ReverseError, TemplateError};
use std::fmt;

/// Where an atom sits in the template. Decides whether `?` may mark a
/// capture optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A path segment.
    Path,
    /// A query value. `optional_key` is set when the key carried a `?` suffix.
    Query {
        /// The key was written as `key?=...`.
        optional_key: bool,
    },
    /// The fragment.
    Hash,
}

/// A named capture.
#[derive(Debug, Clone)]
pub struct Capture {
    name: String,
    constraint: Option<Constraint>,
    optional: bool,
}

impl Capture {
    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constraint, if any.
    #[must_use]
    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    /// May the value be absent?
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// One compiled template atom.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Matches and renders exactly this text.
    Literal(String),
    /// Binds the candidate to a parameter name.
    Capture(Capture),
}

/// Outcome of testing one candidate value against a [`Segment`].
///
/// The binding and the verdict are kept apart: a capture reports its name
/// even when its constraint rejects the value, and the caller decides what
/// the overall match does with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentMatch<'s> {
    /// Name the candidate binds to (captures only).
    pub binding: Option<&'s str>,
    /// Did the candidate satisfy the segment?
    pub satisfied: bool,
}

impl Segment {
    /// Compile one atom.
    ///
    /// `atom` is the raw piece of the shielded template; it is decoded here.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::UnclosedConstraint`] if a `<` is not closed by a final `>`
    /// - [`TemplateError::InvalidSegment`] for an empty name, or a `?` marker outside a query value
    /// - [`TemplateError::InvalidConstraint`] / [`TemplateError::PatternTooLong`] from the constraint
    ///
    /// # Example
    ///
    /// ```
    /// use teki::{Placement, Segment};
    ///
    /// let segment = Segment::parse(":id<\\d+>", Placement::Path).unwrap();
    /// assert_eq!(segment.name(), Some("id"));
    /// assert!(segment.match_value("42").satisfied);
    /// assert!(!segment.match_value("4x").satisfied);
    /// ```
    pub fn parse(atom: &str, placement: Placement) -> Result<Self, TemplateError> {
        let Some(rest) = atom.strip_prefix(':') else {
            return Ok(Self::Literal(decode(atom).into_owned()));
        };

        let (head, constraint) = match rest.find('<') {
            Some(ix) => {
                let body = rest[ix + 1..].strip_suffix('>').ok_or_else(|| {
                    TemplateError::UnclosedConstraint {
                        segment: decode(atom).into_owned(),
                    }
                })?;
                (&rest[..ix], Some(Constraint::new(&decode(body))?))
            }
            None => (rest, None),
        };

        let (name, marked_optional) = match head.strip_suffix('?') {
            Some(name) => (name, true),
            None => (head, false),
        };

        if marked_optional && !matches!(placement, Placement::Query { .. }) {
            return Err(TemplateError::InvalidSegment {
                segment: decode(atom).into_owned(),
                reason: "only query values may be marked optional",
            });
        }

        let name = decode(name).into_owned();
        if name.is_empty() {
            return Err(TemplateError::InvalidSegment {
                segment: decode(atom).into_owned(),
                reason: "capture has no name",
            });
        }

        let optional = marked_optional
            || matches!(placement, Placement::Query { optional_key: true });

        Ok(Self::Capture(Capture {
            name,
            constraint,
            optional,
        }))
    }

    /// The capture name, or `None` for a literal.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Capture(capture) => Some(capture.name.as_str()),
        }
    }

    /// Is this an optional capture?
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Capture(capture) if capture.optional)
    }

    /// Test a decoded candidate value.
    #[must_use]
    pub fn match_value(&self, candidate: &str) -> SegmentMatch<'_> {
        match self {
            Self::Literal(text) => SegmentMatch {
                binding: None,
                satisfied: candidate == text,
            },
            Self::Capture(capture) => SegmentMatch {
                binding: Some(capture.name.as_str()),
                satisfied: capture
                    .constraint
                    .as_ref()
                    .map_or(true, |c| c.is_match(candidate)),
            },
        }
    }

    /// Render this segment from a dictionary (unencoded).
    ///
    /// Returns `Ok(None)` when an optional capture is absent, so the caller
    /// can omit it.
    ///
    /// # Errors
    ///
    /// Returns [`ReverseError::MissingParameter`] if a required capture is absent.
    pub fn render<'a>(&'a self, params: &'a Params) -> Result<Option<&'a str>, ReverseError> {
        match self {
            Self::Literal(text) => Ok(Some(text.as_str())),
            Self::Capture(capture) => match params.get(&capture.name) {
                Some(value) => Ok(Some(value)),
                None if capture.optional => Ok(None),
                None => Err(ReverseError::MissingParameter {
                    name: capture.name.clone(),
                }),
            },
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Capture(capture) => {
                write!(f, ":{}", capture.name)?;
                if capture.optional {
                    f.write_str("?")?;
                }
                if let Some(constraint) = &capture.constraint {
                    write!(f, "{constraint}")?;
                }
                Ok(())
            }
        }
    }
}
