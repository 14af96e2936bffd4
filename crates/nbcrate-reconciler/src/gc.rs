//! End-of-run cleanup of files and people nothing accounts for any more
//!
//! Both passes only remove entities. References to a removed entity that
//! remain elsewhere (for example in a CreateAction's result list) are left
//! in place.

use nbcrate_core::ids::{is_notebook, is_url};
use nbcrate_core::EntityGraph;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// Remove File entities that are gone from disk or no longer used by any run.
///
/// A File goes when it is not a URL and exists under none of `data_paths`,
/// or when no CreateAction lists it as object or result and it is not a
/// notebook. Either condition is enough. Returns the removed identifiers.
pub fn remove_deleted_files(graph: &mut EntityGraph, data_paths: &[PathBuf]) -> Vec<String> {
    let used: HashSet<String> = graph
        .entities_of_types(&["CreateAction"])
        .flat_map(|action| {
            let mut ids = action.references("object");
            ids.extend(action.references("result"));
            ids
        })
        .map(str::to_string)
        .collect();

    let doomed: Vec<String> = graph
        .ids_of_type("File")
        .into_iter()
        .filter(|id| {
            let missing = !is_url(id) && !data_paths.iter().any(|dir| dir.join(id).exists());
            let unused = !used.contains(id) && !is_notebook(id);
            missing || unused
        })
        .collect();

    for id in &doomed {
        debug!("Removing file {}", id);
        graph.remove(id);
    }
    doomed
}

/// Remove Persons that neither the root nor any File names as an author.
/// Returns the removed identifiers.
pub fn remove_unreferenced_authors(graph: &mut EntityGraph) -> Vec<String> {
    let mut reachable: HashSet<String> = graph
        .root()
        .map(|root| root.references("author").into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    reachable.extend(
        graph
            .entities_of_types(&["File"])
            .flat_map(|file| file.references("author"))
            .map(str::to_string),
    );

    let doomed: Vec<String> = graph
        .ids_of_type("Person")
        .into_iter()
        .filter(|id| !reachable.contains(id))
        .collect();

    for id in &doomed {
        debug!("Removing person {}", id);
        graph.remove(id);
    }
    doomed
}
