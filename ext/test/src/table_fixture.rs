//! Route table fixture runner.
//!
//! Loads YAML fixtures whose `config` uses the route table config format (the
//! same YAML shape the CLI reads with `--routes`). This exercises the config
//! loading path: YAML → `RouteTableConfig` → `RouteTable::from_config()` →
//! resolve / reverse.

use crate::CaseResult;
use serde::Deserialize;
use teki::{Params, RouteTable, RouteTableConfig, TableError};

/// A route table fixture.
#[derive(Debug, Deserialize)]
pub struct TableFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: RouteTableConfig,
    /// Expected load error variant (e.g. `DuplicateRoute`).
    #[serde(default)]
    pub expect_error: Option<String>,
    #[serde(default)]
    pub resolves: Vec<ResolveCase>,
    #[serde(default)]
    pub links: Vec<LinkCase>,
}

/// One URL to resolve. No `expect` means no route matches.
#[derive(Debug, Deserialize)]
pub struct ResolveCase {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub expect: Option<ResolvedRoute>,
}

/// Expected outcome of a resolve.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolvedRoute {
    pub route: String,
    #[serde(default)]
    pub params: Params,
}

/// One named route to reverse. No `expect` means reversal fails.
#[derive(Debug, Deserialize)]
pub struct LinkCase {
    pub name: String,
    pub route: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub expect: Option<String>,
}

fn load_error_kind(err: &TableError) -> &'static str {
    match err {
        TableError::Template { .. } => "Template",
        TableError::DuplicateRoute { .. } => "DuplicateRoute",
        TableError::TooManyRoutes { .. } => "TooManyRoutes",
    }
}

impl TableFixture {
    /// Parse a single table fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple table fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Load the table and run all cases.
    pub fn run(&self) -> Vec<CaseResult> {
        let loaded = RouteTable::from_config(&self.config);

        if let Some(kind) = &self.expect_error {
            let actual = loaded.map(|_| "loaded").map_err(|e| load_error_kind(&e));
            return vec![CaseResult::compare("load", &Err::<&str, _>(kind.as_str()), &actual)];
        }

        let table = match loaded {
            Ok(table) => table,
            Err(err) => {
                return vec![CaseResult {
                    case_name: "load".to_string(),
                    passed: false,
                    expected: "table loads".to_string(),
                    actual: err.to_string(),
                }]
            }
        };

        let resolves = self.resolves.iter().map(|case| {
            let actual = table.resolve(&case.url).map(|hit| ResolvedRoute {
                route: hit.name.to_string(),
                params: hit.params,
            });
            CaseResult::compare(&case.name, &case.expect, &actual)
        });
        let links = self.links.iter().map(|case| {
            let actual = table.reverse(&case.route, &case.params).ok();
            CaseResult::compare(&case.name, &case.expect, &actual)
        });
        resolves.chain(links).collect()
    }

    /// Run all cases and panic on first failure.
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Table fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}
