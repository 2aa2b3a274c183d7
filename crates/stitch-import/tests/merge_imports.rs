/*
 * merge_imports.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for import tags used as merge-key values.
 */

mod common;

use common::{loader_at, project};
use stitch_import::{ImportError, Yaml};

const A: &str = "key-a: value-a\nkey-b: value-b\n";
const B: &str = "key-b: value-Bee\nkey-c: value-Cee\n";

fn load(document: &str) -> Result<Yaml, ImportError> {
    let temp = project(&[("A.yml", A), ("B.yml", B), ("C.yml", "key-d: value-d\n")]);
    loader_at(temp.path()).load_str(document, "doc.yml")
}

fn entries(value: &Yaml) -> Vec<(String, String)> {
    value
        .as_hash()
        .unwrap()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().unwrap().to_string(),
                v.as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn sequence_of_imports_later_wins() {
    let value = load("merged:\n  <<: [!import A.yml, !import B.yml]\n").unwrap();
    assert_eq!(
        entries(&value["merged"]),
        pairs(&[
            ("key-a", "value-a"),
            ("key-b", "value-Bee"),
            ("key-c", "value-Cee"),
        ])
    );
}

#[test]
fn sequential_merge_keys_match_sequence_form() {
    let sequence = load("m:\n  <<: [!import A.yml, !import B.yml]\n").unwrap();
    let sequential = load("m:\n  <<: !import A.yml\n  <<: !import B.yml\n").unwrap();
    assert_eq!(sequence["m"]["key-b"].as_str(), Some("value-Bee"));
    assert_eq!(sequential["m"]["key-b"].as_str(), Some("value-Bee"));
}

#[test]
fn disjoint_imports_union() {
    let value = load("m:\n  <<: !import A.yml\n  <<: !import C.yml\n").unwrap();
    assert_eq!(
        entries(&value["m"]),
        pairs(&[
            ("key-a", "value-a"),
            ("key-b", "value-b"),
            ("key-d", "value-d"),
        ])
    );
}

#[test]
fn own_keys_override_imports() {
    let value = load("m:\n  key-b: mine\n  <<: [!import A.yml, !import B.yml]\n").unwrap();
    assert_eq!(value["m"]["key-b"].as_str(), Some("mine"));
    assert_eq!(value["m"]["key-c"].as_str(), Some("value-Cee"));
}

#[test]
fn anchor_import_as_merge_source() {
    let temp = project(&[("defs.yml", "base: &base\n  color: red\n  size: 1\n")]);
    let value = loader_at(temp.path())
        .load_str("item:\n  <<: !import.anchor defs.yml#base\n  size: 2\n", "doc.yml")
        .unwrap();
    assert_eq!(value["item"]["color"].as_str(), Some("red"));
    assert_eq!(value["item"]["size"].as_i64(), Some(2));
}

#[test]
fn non_import_merge_values_keep_standard_error() {
    let err = load("m:\n  <<: 42\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected a mapping or list of mappings for merging, but found scalar"
    );
}
