//! `Constraint`: a regular expression that must match a whole value.

use crate::{TemplateError, MAX_CONSTRAINT_LENGTH};
use std::fmt;

/// Upper bound on the compiled program size of a single constraint.
const MAX_REGEX_SIZE: usize = 1 << 20;

/// A compiled `<...>` constraint.
///
/// The pattern is anchored at both ends, so `<a+>` accepts `aaa` but rejects
/// `xa` and `ax`. Patterns use the Rust `regex` crate syntax, which guarantees
/// linear-time matching (no catastrophic backtracking).
///
/// # Example
///
/// ```
/// use teki::Constraint;
///
/// let c = Constraint::new("a+").unwrap();
/// assert!(c.is_match("aaa"));
/// assert!(!c.is_match("xa"));
/// assert!(!c.is_match("ax"));
/// ```
#[derive(Debug, Clone)]
pub struct Constraint {
    pattern: String,
    regex: regex::Regex,
}

impl Constraint {
    /// Compile a constraint from the text found between `<` and `>`.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::PatternTooLong`] if the pattern exceeds [`MAX_CONSTRAINT_LENGTH`]
    /// - [`TemplateError::InvalidConstraint`] if the regex does not compile
    pub fn new(pattern: &str) -> Result<Self, TemplateError> {
        if pattern.len() > MAX_CONSTRAINT_LENGTH {
            return Err(TemplateError::PatternTooLong {
                len: pattern.len(),
                max: MAX_CONSTRAINT_LENGTH,
            });
        }

        let regex = regex::RegexBuilder::new(&format!("^(?:{pattern})$"))
            .size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|e| TemplateError::InvalidConstraint {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The constraint as written, without the implicit anchors.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Does `candidate` match the constraint in full?
    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.pattern)
    }
}
