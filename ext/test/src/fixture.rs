//! Template fixture runner
//!
//! Loads YAML fixtures and runs them against a single compiled template.
//!
//! ```yaml
//! name: optional query
//! template: /foo?lorem?=:lorem
//! matches:
//!   - name: present
//!     url: http://localhost/foo?lorem=123
//!     expect: { lorem: "123" }
//!   - name: absent binds null
//!     url: http://localhost/foo
//!     expect: { lorem: ~ }
//! reverses:
//!   - name: absent is omitted
//!     params: { lorem: ~ }
//!     expect: /foo
//! ```
//!
//! A match case without `expect` asserts that the URL does not match. A
//! reverse case asserts either the rendered URL (`expect`) or the name of
//! the missing parameter (`missing`).

use crate::{error_kind, CaseResult};
use serde::Deserialize;
use teki::{Params, ReverseError, Template};

/// A template fixture.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub template: String,
    /// Expected compile error variant (e.g. `UnclosedConstraint`).
    #[serde(default)]
    pub compile_error: Option<String>,
    #[serde(default)]
    pub matches: Vec<MatchCase>,
    #[serde(default)]
    pub reverses: Vec<ReverseCase>,
}

/// One URL to match.
#[derive(Debug, Deserialize)]
pub struct MatchCase {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub expect: Option<Params>,
}

/// One dictionary to reverse.
#[derive(Debug, Deserialize)]
pub struct ReverseCase {
    pub name: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub expect: Option<String>,
    /// Name of the parameter reported missing.
    #[serde(default)]
    pub missing: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Cases
// ═══════════════════════════════════════════════════════════════════════════════

impl MatchCase {
    /// Match, and check that the traced result agrees with the plain one.
    fn run(&self, template: &Template) -> CaseResult {
        let actual = template.matches(&self.url);
        let traced = template.match_with_trace(&self.url).result;
        if traced != actual {
            return CaseResult {
                case_name: self.name.clone(),
                passed: false,
                expected: format!("trace result {actual:?}"),
                actual: format!("trace result {traced:?}"),
            };
        }
        CaseResult::compare(&self.name, &self.expect, &actual)
    }
}

impl ReverseCase {
    fn run(&self, template: &Template) -> CaseResult {
        let actual = template.reverse(&self.params);
        let expected = match (&self.missing, &self.expect) {
            (Some(name), _) => Err(ReverseError::MissingParameter { name: name.clone() }),
            (None, Some(url)) => Ok(url.clone()),
            (None, None) => {
                return CaseResult {
                    case_name: self.name.clone(),
                    passed: false,
                    expected: "a reverse case needs `expect` or `missing`".to_string(),
                    actual: format!("{actual:?}"),
                }
            }
        };
        CaseResult::compare(&self.name, &expected, &actual)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all cases and return results
    pub fn run(&self) -> Vec<CaseResult> {
        let compiled = Template::compile(&self.template);

        if let Some(kind) = &self.compile_error {
            let actual = compiled.map(|_| "compiled").map_err(|e| error_kind(&e));
            return vec![CaseResult::compare(
                "compile",
                &Err::<&str, _>(kind.as_str()),
                &actual,
            )];
        }

        let template = match compiled {
            Ok(template) => template,
            Err(err) => {
                return vec![CaseResult {
                    case_name: "compile".to_string(),
                    passed: false,
                    expected: "template compiles".to_string(),
                    actual: err.to_string(),
                }]
            }
        };

        self.matches
            .iter()
            .map(|case| case.run(&template))
            .chain(self.reverses.iter().map(|case| case.run(&template)))
            .collect()
    }

    /// Run all cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_case_is_reported() {
        let fixture = Fixture::from_yaml(
            r"
name: wrong expectation
template: /user/:id
matches:
  - name: bad
    url: /user/1
    expect: { id: '2' }
",
        )
        .unwrap();
        let results = fixture.run();
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
    }

    #[test]
    fn compile_error_fixture() {
        let fixture = Fixture::from_yaml(
            r"
name: unclosed
template: /foo/:path<oops
compile_error: UnclosedConstraint
",
        )
        .unwrap();
        fixture.run_and_assert();
    }

    #[test]
    fn unexpected_compile_error_fails() {
        let fixture = Fixture::from_yaml("name: broken\ntemplate: no-slash\n").unwrap();
        let results = fixture.run();
        assert!(!results[0].passed);
    }

    #[test]
    fn reverse_case_without_expectation_fails() {
        let fixture = Fixture::from_yaml(
            r"
name: incomplete
template: /a
reverses:
  - name: nothing asserted
",
        )
        .unwrap();
        assert!(!fixture.run()[0].passed);
    }
}
