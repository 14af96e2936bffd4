//! Unit tests for nbcrate-core module

use crate::ids::*;
use crate::test_utils::sample_graph;
use crate::*;

#[test]
fn test_person_id_derivation() {
    assert_eq!(
        person_id("Doe, Jane", Some("0000-0000-0000-0001")),
        "https://orcid.org/0000-0000-0000-0001"
    );
    assert_eq!(
        person_id("Doe, Jane", Some("https://orcid.org/0000-0000-0000-0001")),
        "https://orcid.org/0000-0000-0000-0001"
    );
    assert_eq!(person_id("Doe, Jane", None), "#Doe_Jane");

    // An empty orcid falls back to the name
    assert_eq!(person_id("Doe, Jane", Some("")), "#Doe_Jane");
}

#[test]
fn test_person_id_is_stable_across_upserts() {
    let mut graph = EntityGraph::new();
    for _ in 0..3 {
        let id = person_id("Doe, Jane", Some("0000-0000-0000-0001"));
        graph.upsert(&id, properties! { "@type" => "Person", "name" => "Doe, Jane" });
    }
    assert_eq!(graph.len(), 1);
    assert!(graph.contains("https://orcid.org/0000-0000-0000-0001"));
}

#[test]
fn test_file_and_action_ids() {
    assert_eq!(file_id("data/output.csv", None), "data/output.csv");
    assert_eq!(
        file_id("https://github.com/example/data/blob/main/output.csv", Some("https://github.com/example/data")),
        "output.csv"
    );
    // References outside the data repository keep their full form
    assert_eq!(
        file_id("https://example.org/output.csv", Some("https://github.com/example/data")),
        "https://example.org/output.csv"
    );
    assert_eq!(file_id("output.csv", Some("")), "output.csv");

    assert_eq!(action_id("harvest.ipynb", 0), "harvest_run_0");
    assert_eq!(
        action_id("https://github.com/example/code/blob/main/harvest.ipynb", 2),
        "harvest_run_2"
    );
    assert_eq!(update_action_id("1.2.0"), "create_version_1_2_0");
    assert_eq!(trailing_segment("https://github.com/example/data/"), "data");
}

#[test]
fn test_merge_overlay_law() {
    let mut graph = EntityGraph::new();
    graph.upsert("x", properties! { "a" => 1u64 });
    graph.upsert("x", properties! { "b" => 2u64 });

    let entity = graph.get("x").unwrap();
    assert_eq!(entity.get("a"), Some(&Value::from(1u64)));
    assert_eq!(entity.get("b"), Some(&Value::from(2u64)));
    assert_eq!(entity.properties.len(), 2);
}

#[test]
fn test_upsert_is_idempotent() {
    let mut once = EntityGraph::new();
    once.upsert("x", properties! { "name" => "one", "size" => 3u64 });

    let mut twice = once.clone();
    twice.upsert("x", properties! { "name" => "one", "size" => 3u64 });

    assert_eq!(once, twice);
}

#[test]
fn test_upsert_with_defaults_only_for_new_entities() {
    let mut graph = EntityGraph::new();
    graph.upsert_with(
        "nb.ipynb",
        || properties! { "@type" => "File", "category" => "harvest" },
        properties! { "name" => "First" },
    );
    graph.upsert_with(
        "nb.ipynb",
        || properties! { "@type" => "File", "category" => "changed" },
        properties! { "name" => "Second" },
    );

    let entity = graph.get("nb.ipynb").unwrap();
    assert_eq!(entity.text("category"), Some("harvest"));
    assert_eq!(entity.text("name"), Some("Second"));
}

#[test]
fn test_upsert_keeps_position() {
    let mut graph = EntityGraph::new();
    graph.upsert("a", Properties::new());
    graph.upsert("b", Properties::new());
    graph.upsert("a", properties! { "name" => "A" });

    let order: Vec<_> = graph.entities().map(|e| e.id.as_str()).collect();
    assert_eq!(order, vec!["a", "b"]);
}

#[test]
fn test_append_reference_is_set_like() {
    let mut entity = Entity::new("nb.ipynb", Properties::new());

    assert!(entity.append_reference("author", "#Doe_Jane"));
    assert!(!entity.append_reference("author", "#Doe_Jane"));
    assert!(entity.append_reference("author", "#Roe_Richard"));
    assert_eq!(entity.references("author"), vec!["#Doe_Jane", "#Roe_Richard"]);
}

#[test]
fn test_append_reference_promotes_single_reference() {
    let mut entity = Entity::new("x", properties! { "license" => Value::reference("mit") });

    assert!(!entity.append_reference("license", "mit"));
    assert!(entity.append_reference("license", "cc0"));
    assert_eq!(
        entity.get("license"),
        Some(&Value::references(["mit", "cc0"]))
    );
}

#[test]
fn test_types() {
    let graph = sample_graph();
    assert_eq!(graph.ids_of_type("File"), vec!["harvest.ipynb", "articles.csv"]);

    let notebooks: Vec<_> = graph
        .entities_of_types(&["File", "SoftwareSourceCode"])
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(notebooks, vec!["harvest.ipynb"]);
}

#[test]
fn test_remove_leaves_dangling_references() {
    let mut graph = sample_graph();
    assert!(graph.remove("articles.csv").is_some());

    let action = graph.get("harvest_run_0").unwrap();
    assert_eq!(action.references("result"), vec!["articles.csv"]);
    assert!(graph.get("articles.csv").is_none());
}

#[test]
fn test_value_json_shapes() {
    let json = serde_json::json!({
        "text": "hello",
        "date": "2023-06-15",
        "loose_date": "2023-6-15",
        "ref": {"@id": "./"},
        "embedded": {"@id": "x", "name": "y"},
        "flag": true,
        "list": [{"@id": "a"}, "b"],
    });
    let serde_json::Value::Object(map) = json else { unreachable!() };
    let values: Vec<Value> = map.into_iter().map(|(_, v)| Value::from_json(v)).collect();

    assert_eq!(values[0], Value::text("hello"));
    assert!(matches!(values[1], Value::Date(_)));
    assert_eq!(values[2], Value::text("2023-6-15"));
    assert_eq!(values[3], Value::reference("./"));
    assert!(matches!(values[4], Value::Other(_)));
    assert!(matches!(values[5], Value::Other(_)));
    assert_eq!(values[6], Value::List(vec![Value::reference("a"), Value::text("b")]));
}

#[test]
fn test_document_round_trip_is_byte_identical() {
    let graph = sample_graph();
    let first = to_json_string(&graph).unwrap();
    let reparsed = from_json_str(&first).unwrap();
    let second = to_json_string(&reparsed).unwrap();

    assert_eq!(first, second);
    assert_eq!(graph, reparsed);
}

#[test]
fn test_document_entity_shape() {
    let json = to_json_string(&sample_graph()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(doc["@context"], DEFAULT_CONTEXT);
    let first = &doc["@graph"][0];
    assert_eq!(first["@id"], "./");
    assert_eq!(first["author"][0]["@id"], "https://orcid.org/0000-0001-7956-4498");

    // @id is always the first key
    let keys: Vec<_> = first.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys[0], "@id");
}

#[test]
fn test_invalid_documents() {
    assert!(matches!(from_json_str("{}"), Err(DocumentError::MissingGraph)));
    assert!(matches!(from_json_str("not json"), Err(DocumentError::Json(_))));
    assert!(matches!(
        from_json_str(r#"{"@graph": [{"name": "no id"}]}"#),
        Err(DocumentError::InvalidEntity(0))
    ));
}

#[test]
fn test_save_and_load_document() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(load_document(dir.path()).unwrap().is_none());

    let graph = sample_graph();
    let path = save_document(&graph, &dir.path().join("data-rocrate")).unwrap();
    assert!(path.ends_with("data-rocrate/ro-crate-metadata.json"));
    assert!(!dir.path().join("data-rocrate/ro-crate-metadata.json.tmp").exists());

    let loaded = load_document(&dir.path().join("data-rocrate")).unwrap().unwrap();
    assert_eq!(loaded, graph);
}

#[test]
fn test_associated_datasets_prefers_parent() {
    let mut graph = sample_graph();
    assert_eq!(associated_datasets(&graph).into_iter().collect::<Vec<_>>(), vec!["articles.csv"]);

    graph
        .get_mut("articles.csv")
        .unwrap()
        .set("isPartOf", Value::reference("https://github.com/example/trove-data/"));
    graph.upsert(
        "https://github.com/example/trove-data/",
        properties! { "@type" => "Dataset", "name" => "trove-data" },
    );
    assert_eq!(
        associated_datasets(&graph).into_iter().collect::<Vec<_>>(),
        vec!["https://github.com/example/trove-data/"]
    );
}

#[test]
fn test_render_readme() {
    let options = SummaryOptions {
        workbench: Some(("GLAM Workbench".to_string(), "https://glam-workbench.net".to_string())),
        credit: Some(
            "Created by [Tim Sherratt](https://timsherratt.au) for the [GLAM Workbench](https://glam-workbench.net)"
                .to_string(),
        ),
    };
    let readme = render_readme(&sample_graph(), &options);

    insta::assert_snapshot!(readme.trim_end(), @r"
    # trove-newspapers

    A GLAM Workbench repository

    ## Notebooks

    - [Harvest articles](https://github.com/example/trove-newspapers/blob/main/harvest.ipynb)

    ## Associated datasets

    - [articles.csv](https://github.com/example/trove-newspapers/blob/main/articles.csv)

    <!-- START RUN INFO -->

    <!-- END RUN INFO -->

    ----
    Created by [Tim Sherratt](https://timsherratt.au) for the [GLAM Workbench](https://glam-workbench.net)
    ");
}

#[test]
fn test_render_readme_with_version_and_docs() {
    let mut graph = sample_graph();
    graph.root_mut().unwrap().overlay(properties! {
        "version" => "v1.1.0",
        "mainEntityOfPage" => Value::reference("https://glam-workbench.net/trove-newspapers/"),
    });
    graph.upsert(
        "https://glam-workbench.net/trove-newspapers/",
        properties! {
            "@type" => "CreativeWork",
            "name" => "Trove newspapers",
            "url" => "https://glam-workbench.net/trove-newspapers/",
        },
    );

    let readme = render_readme(&graph, &SummaryOptions::default());
    assert!(readme.contains("CURRENT VERSION: v1.1.0\n"));
    assert!(readme.contains(
        "see the [Trove newspapers](https://glam-workbench.net/trove-newspapers/) section.\n"
    ));
    assert!(!readme.contains("----"));
}
