//! teki-test: conformance fixtures for the teki template engine
//!
//! Fixtures are YAML documents under `fixtures/`, one directory per kind:
//!
//! | Directory | Runner | Exercises |
//! |-----------|--------|-----------|
//! | `fixtures/templates/` | [`fixture::Fixture`] | compile, match, trace, reverse |
//! | `fixtures/tables/` | [`table_fixture::TableFixture`] | route table load, resolve, link |
//!
//! # Example
//!
//! ```
//! use teki_test::prelude::*;
//!
//! let yaml = r#"
//! name: user by id
//! template: '/user/:id<\d+>'
//! matches:
//!   - name: numeric id
//!     url: http://h/user/123
//!     expect: { id: "123" }
//!   - name: non-numeric id
//!     url: http://h/user/abc
//! "#;
//!
//! let fixture = Fixture::from_yaml(yaml).unwrap();
//! fixture.run_and_assert();
//! ```

use std::path::PathBuf;
use teki::TemplateError;

#[cfg(feature = "fixtures")]
pub mod fixture;
#[cfg(feature = "fixtures")]
pub mod table_fixture;

/// Directory holding the YAML fixtures of this crate.
#[must_use]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Variant name of a compile error, as written in fixtures.
#[must_use]
pub fn error_kind(err: &TemplateError) -> &'static str {
    match err {
        TemplateError::InvalidTemplate { .. } => "InvalidTemplate",
        TemplateError::InvalidSegment { .. } => "InvalidSegment",
        TemplateError::UnclosedConstraint { .. } => "UnclosedConstraint",
        TemplateError::InvalidConstraint { .. } => "InvalidConstraint",
        TemplateError::PatternTooLong { .. } => "PatternTooLong",
    }
}

/// Result of running a single fixture case.
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl CaseResult {
    fn compare<T: PartialEq + std::fmt::Debug>(case_name: &str, expected: &T, actual: &T) -> Self {
        Self {
            case_name: case_name.to_string(),
            passed: expected == actual,
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    #[cfg(feature = "fixtures")]
    pub use super::fixture::Fixture;
    #[cfg(feature = "fixtures")]
    pub use super::table_fixture::TableFixture;
    pub use super::{error_kind, fixtures_dir, CaseResult};
    pub use teki::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_names_the_variant() {
        let err = teki::Template::compile("/foo/:path<oops").unwrap_err();
        assert_eq!(error_kind(&err), "UnclosedConstraint");
        let err = teki::Template::compile("foo").unwrap_err();
        assert_eq!(error_kind(&err), "InvalidTemplate");
    }

    #[test]
    fn compare_reports_debug_text() {
        let result = CaseResult::compare("c", &Some(1), &None);
        assert!(!result.passed);
        assert_eq!(result.expected, "Some(1)");
        assert_eq!(result.actual, "None");
    }
}
