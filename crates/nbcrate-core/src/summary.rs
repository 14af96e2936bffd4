//! Human-readable summary of a crate, rendered as a README

use crate::graph::EntityGraph;
use crate::model::Entity;
use indexmap::IndexSet;

/// Markers that bracket the run information block filled in by CI.
pub const RUN_INFO_MARKERS: &str = "<!-- START RUN INFO -->\n\n<!-- END RUN INFO -->";

/// Options for [`render_readme`].
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Name and URL of the collection the documentation page belongs to.
    pub workbench: Option<(String, String)>,
    /// Footer line, already formatted as Markdown.
    pub credit: Option<String>,
}

/// Render a Markdown summary of the notebooks and associated datasets.
///
/// Reads the graph only. Dangling references are skipped.
pub fn render_readme(graph: &EntityGraph, options: &SummaryOptions) -> String {
    let root = graph.root();
    let field = |key: &str| root.and_then(|r| r.text(key)).unwrap_or_default();

    let mut md = format!("# {}\n\n", field("name"));

    if let Some(version) = root.and_then(|r| r.get("version")).and_then(|v| v.as_date_string()) {
        md.push_str(&format!("CURRENT VERSION: {version}\n\n"));
    }

    md.push_str(field("description"));
    md.push_str("\n\n");

    let section = root
        .and_then(|r| r.references("mainEntityOfPage").first().copied())
        .and_then(|id| graph.get(id));
    if let Some(section) = section {
        md.push_str(&format!(
            "For more information and documentation see the {} section",
            link(section)
        ));
        if let Some((name, url)) = &options.workbench {
            md.push_str(&format!(" of the [{name}]({url})"));
        }
        md.push_str(".\n\n");
    }

    md.push_str("## Notebooks\n\n");
    for notebook in graph.entities_of_types(&["File", "SoftwareSourceCode"]) {
        md.push_str(&format!("- {}\n", link(notebook)));
    }

    let datasets = associated_datasets(graph);
    if !datasets.is_empty() {
        md.push_str("\n## Associated datasets\n\n");
        for id in datasets {
            if let Some(dataset) = graph.get(id) {
                md.push_str(&format!("- {}\n", link(dataset)));
            }
        }
    }

    md.push('\n');
    md.push_str(RUN_INFO_MARKERS);
    md.push('\n');

    if let Some(credit) = &options.credit {
        md.push_str("\n----\n");
        md.push_str(credit);
        md.push('\n');
    }

    md
}

/// Result files of every CreateAction, each replaced by the dataset it is
/// part of when it has one. First occurrence wins.
pub fn associated_datasets(graph: &EntityGraph) -> IndexSet<&str> {
    let mut datasets = IndexSet::new();
    for action in graph.entities().filter(|e| e.has_type("CreateAction")) {
        for result in action.references("result") {
            let Some(file) = graph.get(result) else {
                continue;
            };
            let parent = file.references("isPartOf").first().copied();
            datasets.insert(parent.unwrap_or(file.id.as_str()));
        }
    }
    datasets
}

fn link(entity: &Entity) -> String {
    let name = entity.text("name").unwrap_or(&entity.id);
    let url = entity.text("url").unwrap_or(&entity.id);
    format!("[{name}]({url})")
}
