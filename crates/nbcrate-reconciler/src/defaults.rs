//! Fixed reference entities every crate carries

use nbcrate_core::{properties, EntityGraph, Value, METADATA_ID, ROOT_ID};

pub const RO_CRATE_SPEC: &str = "https://w3id.org/ro/crate/1.1";
pub const MIT_LICENSE: &str = "https://spdx.org/licenses/MIT";
pub const CC0_LICENSE: &str = "https://creativecommons.org/publicdomain/zero/1.0/";
pub const NKC_LICENSE: &str = "http://rightsstatements.org/vocab/NKC/1.0/";
pub const CNE_LICENSE: &str = "http://rightsstatements.org/vocab/CNE/1.0/";
pub const PYTHON: &str = "https://www.python.org/downloads/release/python-31012/";
pub const NOTEBOOK_PROFILE: &str = "https://purl.archive.org/textcommons/profile#Notebook";
pub const NOTEBOOK_FORMAT: &str = "application/x-ipynb+json";
const NKC_DESCRIPTION: &str = "The organization that has made the Item available reasonably believes that the Item is not restricted by copyright or related rights, but a conclusive determination could not be made.";
const CNE_DESCRIPTION: &str = "The copyright and related rights status of this Item has not been evaluated.";

pub const COMPLETED_STATUS: &str = "http://schema.org/CompletedActionStatus";

/// Upsert the metadata descriptor, licence entities and the programming
/// language. Overlaying the same values each run leaves them unchanged.
pub fn ensure_defaults(graph: &mut EntityGraph) {
    graph.upsert(
        METADATA_ID,
        properties! {
            "@type" => "CreativeWork",
            "conformsTo" => Value::reference(RO_CRATE_SPEC),
            "about" => Value::reference(ROOT_ID),
            "license" => Value::reference(CC0_LICENSE),
        },
    );

    let licences = [
        (MIT_LICENSE, "MIT License", "https://spdx.org/licenses/MIT.html", None),
        (CC0_LICENSE, "CC0 Public Domain Dedication", CC0_LICENSE, None),
        (NKC_LICENSE, "No Known Copyright", NKC_LICENSE, Some(NKC_DESCRIPTION)),
        (CNE_LICENSE, "Copyright Not Evaluated", CNE_LICENSE, Some(CNE_DESCRIPTION)),
    ];
    for (id, name, url, description) in licences {
        let mut props = properties! { "@type" => "CreativeWork" };
        if let Some(description) = description {
            props.insert("description".to_string(), Value::text(description));
        }
        props.insert("name".to_string(), Value::text(name));
        props.insert("url".to_string(), Value::text(url));
        graph.upsert(id, props);
    }

    graph.upsert(
        PYTHON,
        properties! {
            "@type" => Value::types(&["ComputerLanguage", "SoftwareApplication"]),
            "name" => "Python 3.10.12",
            "version" => "3.10.12",
            "url" => PYTHON,
        },
    );
}
