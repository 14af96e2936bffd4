//! Unit tests for nbcrate-notebook module

use crate::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_notebook(dir: &Path, name: &str, content: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();
    path
}

fn notebook_with(metadata: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "cells": [
            {"cell_type": "code", "source": "# not a heading\nprint(1)", "metadata": {}},
            {"cell_type": "markdown", "source": ["Intro text\n"], "metadata": {}},
            {"cell_type": "markdown", "source": ["# Harvest newspaper articles\n", "More text"], "metadata": {}},
        ],
        "metadata": metadata,
        "nbformat": 4,
        "nbformat_minor": 5,
    })
}

#[test]
fn test_missing_annotation_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(dir.path(), "plain.ipynb", notebook_with(serde_json::json!({})));

    let notebook = Notebook::read(&path).unwrap();
    assert!(extract_metadata(&notebook).unwrap().is_none());
}

#[test]
fn test_defaults_fill_missing_keys() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(
        dir.path(),
        "harvest.ipynb",
        notebook_with(serde_json::json!({"rocrate": {}})),
    );

    let metadata = extract_metadata(&Notebook::read(&path).unwrap()).unwrap().unwrap();
    assert_eq!(metadata.name, "harvest.ipynb");
    assert!(metadata.author.is_empty());
    assert_eq!(metadata.description, "");
    assert!(metadata.action.is_empty());
    assert_eq!(metadata.main_entity_of_page, "");
    assert!(metadata.work_example.is_empty());
    assert_eq!(metadata.category, "");
    assert_eq!(metadata.position, 0);
}

#[test]
fn test_single_values_are_listified() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(
        dir.path(),
        "harvest.ipynb",
        notebook_with(serde_json::json!({"rocrate": {
            "name": "Harvest",
            "author": {"name": "Doe, Jane", "orcid": "0000-0000-0000-0001", "mainEntityOfPage": "https://jane.example"},
            "action": [{
                "object": {"url": "input.csv"},
                "result": [{"url": "output.csv", "name": "Output"}, {"url": "https://example.org/data.zip", "license": ["a", "b"]}],
                "local_path": "data",
                "query": "q=1",
            }],
            "position": 3,
        }})),
    );

    let metadata = extract_metadata(&Notebook::read(&path).unwrap()).unwrap().unwrap();
    assert_eq!(metadata.author.len(), 1);
    let author = &metadata.author[0];
    assert_eq!(author.name, "Doe, Jane");
    assert_eq!(author.orcid.as_deref(), Some("0000-0000-0000-0001"));
    assert_eq!(author.extra["mainEntityOfPage"], "https://jane.example");

    let action = &metadata.action[0];
    assert_eq!(action.object.len(), 1);
    assert_eq!(action.object[0].url, "input.csv");
    assert_eq!(action.result.len(), 2);
    assert_eq!(action.result[0].name.as_deref(), Some("Output"));
    assert_eq!(
        action.result[1].license,
        Some(OneOrMany::Many(vec!["a".to_string(), "b".to_string()]))
    );
    assert_eq!(action.local_path(), "data");
    assert_eq!(action.query.as_deref(), Some("q=1"));
    assert_eq!(metadata.position, 3);
    // Only the first result decides where a run stores its data
    assert!(action.writes_to("output.csv"));
    assert!(!action.writes_to("example.org"));
    assert!(metadata.creates_data_in("output.csv"));
    assert!(!metadata.creates_data_in("github.com/example/data"));
}

#[test]
fn test_action_local_path_defaults_to_repository_root() {
    let action = ActionRecord::default();
    assert_eq!(action.local_path(), ".");
}

#[test]
fn test_extract_title() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(dir.path(), "harvest.ipynb", notebook_with(serde_json::json!({})));
    let notebook = Notebook::read(&path).unwrap();
    insta::assert_snapshot!(extract_title(&notebook).unwrap(), @"Harvest newspaper articles");

    let untitled = write_notebook(
        dir.path(),
        "untitled.ipynb",
        serde_json::json!({"cells": [{"cell_type": "markdown", "source": "Some ## text"}], "metadata": {}}),
    );
    assert!(extract_title(&Notebook::read(&untitled).unwrap()).is_none());
}

#[test]
fn test_annotate_writes_and_preserves_layout() {
    let dir = TempDir::new().unwrap();
    let path = write_notebook(
        dir.path(),
        "harvest.ipynb",
        notebook_with(serde_json::json!({"kernelspec": {"name": "python3"}})),
    );

    let mut notebook = Notebook::read(&path).unwrap();
    let authors = vec![AuthorRecord::new("Doe, Jane").with_orcid("0000-0000-0000-0001")];
    assert!(annotate(&mut notebook, &authors, false));
    notebook.write().unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("{\n \"cells\": ["));
    assert!(written.ends_with("}\n"));

    let reread = Notebook::read(&path).unwrap();
    assert_eq!(reread.content["metadata"]["kernelspec"]["name"], "python3");
    let metadata = extract_metadata(&reread).unwrap().unwrap();
    assert_eq!(metadata.name, "Harvest newspaper articles");
    assert_eq!(metadata.author, authors);

    // A second pass leaves annotated notebooks alone
    let mut again = Notebook::read(&path).unwrap();
    assert!(!annotate(&mut again, &[], false));
    assert!(annotate(&mut again, &[], true));
}

#[test]
fn test_find_notebooks_applies_excludes() {
    let dir = TempDir::new().unwrap();
    for name in [
        "b-analysis.ipynb",
        "a-harvest.ipynb",
        "Draft-ideas.ipynb",
        "Untitled.ipynb",
        "index.ipynb",
        "App-explorer.ipynb",
        "notes.md",
    ] {
        fs::write(dir.path().join(name), "{}").unwrap();
    }
    fs::create_dir(dir.path().join("folder.ipynb")).unwrap();

    let found = find_notebooks(dir.path(), &NotebookFilter::default()).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a-harvest.ipynb", "b-analysis.ipynb"]);
}

#[test]
fn test_custom_filter() {
    let filter = NotebookFilter::new(&["scratch-*"]).unwrap();
    assert!(filter.is_excluded("Scratch-1.ipynb"));
    assert!(!filter.is_excluded("draft.ipynb"));
    assert!(NotebookFilter::new(&["[unclosed"]).is_err());
}
