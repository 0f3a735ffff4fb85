//! Conformance tests that run YAML fixtures against teki
//!
//! Run with: cargo test -p teki-test --test conformance

#![cfg(feature = "fixtures")]

use std::fs;
use std::path::{Path, PathBuf};
use teki_test::prelude::*;

/// YAML files of a fixture directory, in name order.
fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    assert!(
        dir.exists(),
        "Fixtures directory does not exist: {}",
        dir.display()
    );

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| {
            path.extension()
                .is_some_and(|e| e == "yaml" || e == "yml")
        })
        .collect();
    files.sort();
    assert!(!files.is_empty(), "no fixtures in {}", dir.display());
    files
}

#[test]
fn test_templates() {
    for path in yaml_files(&fixtures_dir().join("templates")) {
        println!("Running fixture: {}", path.display());
        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

#[test]
fn test_route_tables() {
    for path in yaml_files(&fixtures_dir().join("tables")) {
        println!("Running table fixture: {}", path.display());
        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = TableFixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

/// Round trip: every fixture dictionary that reverses successfully must
/// match its own URL and give the dictionary back, up to absent entries.
#[test]
fn test_reverse_then_match() {
    for path in yaml_files(&fixtures_dir().join("templates")) {
        let yaml = fs::read_to_string(&path).expect("read yaml");
        for fixture in Fixture::from_yaml_multi(&yaml).expect("parse") {
            let Ok(template) = Template::compile(&fixture.template) else {
                continue;
            };
            for case in &fixture.reverses {
                let Ok(url) = template.reverse(&case.params) else {
                    continue;
                };
                let Some(params) = template.matches(&url) else {
                    panic!("'{}' case '{}': {url} does not match", fixture.name, case.name);
                };
                for name in template.names() {
                    if let Some(value) = case.params.get(name) {
                        assert_eq!(
                            params.get(name),
                            Some(value),
                            "'{}' case '{}': {name} via {url}",
                            fixture.name,
                            case.name
                        );
                    }
                }
            }
        }
    }
}
