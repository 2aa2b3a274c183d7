/*
 * import_tags.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the import tags.
 */

mod common;

use common::{loader_at, project};
use stitch_import::{GlobOrder, ImportError, ImportLoader, LoaderOptions, Yaml};

fn keys(value: &Yaml) -> Vec<String> {
    value
        .as_hash()
        .expect("expected a mapping")
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect()
}

#[test]
fn import_replaces_field_with_target_document() {
    let temp = project(&[
        ("main.yml", "field: !import parts/y.yml\nother: 1\n"),
        ("parts/y.yml", "name: y\nlist: [1, 2]\n"),
    ]);
    let value = loader_at(temp.path()).load_file("main.yml").unwrap();

    assert_eq!(value["field"]["name"].as_str(), Some("y"));
    assert_eq!(value["field"]["list"][1].as_i64(), Some(2));
    assert_eq!(value["other"].as_i64(), Some(1));
}

#[test]
fn imports_nest() {
    let temp = project(&[
        ("a.yml", "b: !import b.yml\n"),
        ("b.yml", "c: !import c.yml\n"),
        ("c.yml", "leaf: true\n"),
    ]);
    let value = loader_at(temp.path()).load_file("a.yml").unwrap();
    assert_eq!(value["b"]["c"]["leaf"].as_bool(), Some(true));
}

#[test]
fn relative_paths_resolve_against_root_not_importer() {
    let temp = project(&[
        ("nested/dir/main.yml", "v: !import shared.yml\n"),
        ("shared.yml", "at-root\n"),
        ("nested/dir/shared.yml", "beside-importer\n"),
    ]);
    let value = loader_at(temp.path())
        .load_file("nested/dir/main.yml")
        .unwrap();
    assert_eq!(value["v"].as_str(), Some("at-root"));
}

#[test]
fn import_all_lists_every_match() {
    let temp = project(&[
        ("posts/a.yml", "title: A\n"),
        ("posts/b.yml", "title: B\n"),
        ("posts/c.yml", "title: C\n"),
        ("posts/notes.txt", "ignored\n"),
    ]);
    let mut loader = ImportLoader::new(
        LoaderOptions::default()
            .with_root_dir(temp.path())
            .with_glob_order(GlobOrder::Lexicographic),
    );
    let value = loader
        .load_str("posts: !import-all posts/*.yml\n", "doc.yml")
        .unwrap();

    let titles: Vec<_> = value["posts"]
        .as_vec()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[test]
fn import_all_follows_filesystem_order_by_default() {
    let temp = project(&[
        ("posts/a.yml", "a\n"),
        ("posts/b.yml", "b\n"),
        ("posts/c.yml", "c\n"),
    ]);
    let value = loader_at(temp.path())
        .load_str("!import-all posts/*.yml", "doc.yml")
        .unwrap();

    let expected: Vec<String> = std::fs::read_dir(temp.path().join("posts"))
        .unwrap()
        .map(|e| {
            let name = e.unwrap().file_name().to_string_lossy().into_owned();
            name.trim_end_matches(".yml").to_string()
        })
        .collect();
    let got: Vec<String> = value
        .as_vec()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn import_all_without_matches_is_empty() {
    let temp = project(&[]);
    let value = loader_at(temp.path())
        .load_str("none: !import-all missing/*.yml\n", "doc.yml")
        .unwrap();
    assert_eq!(value["none"].as_vec().map(Vec::len), Some(0));
}

#[test]
fn import_anchor_extracts_subtree() {
    let temp = project(&[(
        "defs.yml",
        "first: &first {x: 1}\nsecond: &second\n  y: 2\n  z: [a, b]\n",
    )]);
    let value = loader_at(temp.path())
        .load_str("picked: !import.anchor defs.yml#second\n", "doc.yml")
        .unwrap();

    assert_eq!(keys(&value["picked"]), vec!["y", "z"]);
    assert_eq!(value["picked"]["z"][0].as_str(), Some("a"));
}

#[test]
fn import_anchor_subtree_may_import() {
    let temp = project(&[
        ("defs.yml", "unused: !import missing.yml\nwanted: &wanted\n  inner: !import leaf.yml\n"),
        ("leaf.yml", "ok\n"),
    ]);
    let value = loader_at(temp.path())
        .load_str("v: !import.anchor defs.yml#wanted\n", "doc.yml")
        .unwrap();
    assert_eq!(value["v"]["inner"].as_str(), Some("ok"));
}

#[test]
fn import_anchor_missing_is_named() {
    let temp = project(&[("defs.yml", "a: &present 1\n")]);
    let err = loader_at(temp.path())
        .load_str("v: !import.anchor defs.yml#absent\n", "doc.yml")
        .unwrap_err();

    match &err {
        ImportError::AnchorNotFound {
            anchor,
            path,
            location,
        } => {
            assert_eq!(anchor, "absent");
            assert!(path.ends_with("defs.yml"));
            assert!(location.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn import_anchor_without_anchor_part_is_malformed() {
    let temp = project(&[("defs.yml", "a: 1\n")]);
    let err = loader_at(temp.path())
        .load_str("v: !import.anchor defs.yml\n", "doc.yml")
        .unwrap_err();
    assert!(matches!(err, ImportError::MalformedReference { .. }));
}

#[test]
fn parameterized_import_adds_captures() {
    let temp = project(&[
        ("items/foo.yml", "name: overridden\nprice: 3\n"),
        ("items/bar.yml", "price: 5\n"),
    ]);
    let mut loader = ImportLoader::new(
        LoaderOptions::default()
            .with_root_dir(temp.path())
            .with_glob_order(GlobOrder::Lexicographic),
    );
    let value = loader
        .load_str("items: !import-all-parameterized items/{name:*}.yml\n", "doc.yml")
        .unwrap();

    let items = value["items"].as_vec().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"].as_str(), Some("bar"));
    assert_eq!(items[0]["price"].as_i64(), Some(5));
    assert_eq!(items[1]["name"].as_str(), Some("foo"));
    assert_eq!(items[1]["price"].as_i64(), Some(3));
    // the capture replaces the file's own key in place
    assert_eq!(keys(&items[1]), vec!["name", "price"]);
}

#[test]
fn parameterized_recursive_capture() {
    let temp = project(&[("docs/guide/intro/page.yml", "title: Intro\n")]);
    let value = loader_at(temp.path())
        .load_str("!import-all-parameterized docs/{section:**}/{slug:*}.yml", "doc.yml")
        .unwrap();

    let page = &value[0];
    assert_eq!(page["section"].as_str(), Some("guide/intro"));
    assert_eq!(page["slug"].as_str(), Some("page"));
    assert_eq!(page["title"].as_str(), Some("Intro"));
}

#[test]
fn parameterized_empty_document_becomes_captures() {
    let temp = project(&[("tags/rust.yml", "")]);
    let value = loader_at(temp.path())
        .load_str("!import-all-parameterized tags/{tag:*}.yml", "doc.yml")
        .unwrap();
    assert_eq!(keys(&value[0]), vec!["tag"]);
    assert_eq!(value[0]["tag"].as_str(), Some("rust"));
}

#[test]
fn parameterized_rejects_non_mapping_documents() {
    let temp = project(&[("tags/rust.yml", "- a\n- b\n")]);
    let err = loader_at(temp.path())
        .load_str("!import-all-parameterized tags/{tag:*}.yml", "doc.yml")
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::ParameterizedNotMapping {
            found: "sequence",
            ..
        }
    ));
}

#[test]
fn import_tag_on_collection_is_a_type_error() {
    let temp = project(&[]);
    let err = loader_at(temp.path())
        .load_str("v: !import {path: a.yml}\n", "doc.yml")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "!import expects a scalar, but was applied to a mapping"
    );

    let err = loader_at(temp.path())
        .load_str("v: !import-all [a.yml]\n", "doc.yml")
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::TagOnNonScalar {
            tag: "!import-all",
            kind: "sequence",
            ..
        }
    ));
}

#[test]
fn empty_import_path_is_malformed() {
    let temp = project(&[]);
    let err = loader_at(temp.path())
        .load_str("v: !import ''\n", "doc.yml")
        .unwrap_err();
    assert!(matches!(err, ImportError::MalformedReference { .. }));
}

#[test]
fn missing_file_is_reported() {
    let temp = project(&[("main.yml", "v: !import gone.yml\n")]);
    let err = loader_at(temp.path()).load_file("main.yml").unwrap_err();
    match err {
        ImportError::NotFound { path, location } => {
            assert!(path.ends_with("gone.yml"));
            assert!(location.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn import_cycle_names_the_chain() {
    let temp = project(&[
        ("a.yml", "next: !import b.yml\n"),
        ("b.yml", "next: !import a.yml\n"),
    ]);
    let err = loader_at(temp.path()).load_file("a.yml").unwrap_err();
    match err {
        ImportError::ImportCycle { chain, .. } => {
            let names: Vec<_> = chain
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect();
            assert_eq!(names, vec!["a.yml", "b.yml", "a.yml"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn same_file_imported_twice_is_not_a_cycle() {
    let temp = project(&[
        ("main.yml", "x: !import shared.yml\ny: !import shared.yml\n"),
        ("shared.yml", "v: 1\n"),
    ]);
    let value = loader_at(temp.path()).load_file("main.yml").unwrap();
    assert_eq!(value["x"], value["y"]);
}

#[test]
fn no_import_tag_survives() {
    let temp = project(&[
        ("main.yml", "a: !import b.yml\nall: !import-all parts/*.yml\n"),
        ("b.yml", "inner: !import c.yml\n"),
        ("c.yml", "deep: !import-all parts/*.yml\n"),
        ("parts/one.yml", "1\n"),
    ]);
    let value = loader_at(temp.path()).load_file("main.yml").unwrap();
    assert_eq!(value["a"]["inner"]["deep"][0].as_i64(), Some(1));
    assert_eq!(value["all"][0].as_i64(), Some(1));
}
