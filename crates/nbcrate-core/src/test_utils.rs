//! Test utilities for nbcrate-core

use crate::{properties, Entity, EntityGraph, Value, ROOT_ID};

/// A small graph: root with one author, a notebook, an output file, and
/// the CreateAction linking them.
pub fn sample_graph() -> EntityGraph {
    let mut graph = EntityGraph::new();

    graph.insert(Entity::new(
        ROOT_ID,
        properties! {
            "@type" => "Dataset",
            "name" => "trove-newspapers",
            "description" => "A GLAM Workbench repository",
            "url" => "https://github.com/example/trove-newspapers/",
            "author" => Value::references(["https://orcid.org/0000-0001-7956-4498"]),
        },
    ));
    graph.insert(Entity::new(
        "https://orcid.org/0000-0001-7956-4498",
        properties! { "@type" => "Person", "name" => "Sherratt, Tim" },
    ));
    graph.insert(Entity::new(
        "harvest.ipynb",
        properties! {
            "@type" => Value::types(&["File", "SoftwareSourceCode"]),
            "name" => "Harvest articles",
            "url" => "https://github.com/example/trove-newspapers/blob/main/harvest.ipynb",
        },
    ));
    graph.insert(Entity::new(
        "articles.csv",
        properties! {
            "@type" => Value::types(&["File", "Dataset"]),
            "name" => "articles.csv",
            "url" => "https://github.com/example/trove-newspapers/blob/main/articles.csv",
        },
    ));
    graph.insert(Entity::new(
        "harvest_run_0",
        properties! {
            "@type" => "CreateAction",
            "instrument" => Value::reference("harvest.ipynb"),
            "result" => Value::references(["articles.csv"]),
        },
    ));

    graph
}
