use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::warn;

use crate::config::NamingConvention;
use crate::model::{Classification, Document, FolderAudit};

/// Every folder that directly contains at least one document.
pub fn document_folders(documents: &[Document]) -> BTreeSet<String> {
    documents
        .iter()
        .map(|document| document.folder.clone())
        .collect()
}

/// Per-folder completeness check.
///
/// Folders with at least one matched document are checked requirement by
/// requirement. Folders that hold documents but no match at all are reported
/// as missing every requirement. The two folder sets are disjoint.
pub fn audit_folders(
    classifications: &[Classification],
    all_folders: &BTreeSet<String>,
    convention: &NamingConvention,
) -> FolderAudit {
    let mut observed: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for classification in classifications {
        let Some(matched) = &classification.matched else {
            continue;
        };
        observed
            .entry(classification.document.folder.as_str())
            .or_default()
            .insert(matched.category.as_str());
    }

    let mut missing_by_folder = FolderAudit::new();
    for (folder, categories) in &observed {
        let missing = missing_requirements(categories, convention);
        if !missing.is_empty() {
            warn!("folder {} is missing {}", folder, missing.join(", "));
            missing_by_folder.insert(folder.to_string(), missing);
        }
    }

    let everything = convention.missing_labels();
    for folder in all_folders {
        if observed.contains_key(folder.as_str()) {
            continue;
        }
        warn!("folder {} has documents but none match a prefix", folder);
        missing_by_folder.insert(folder.clone(), everything.clone());
    }

    missing_by_folder
}

fn missing_requirements(observed: &HashSet<&str>, convention: &NamingConvention) -> Vec<String> {
    convention
        .requirements
        .iter()
        .filter(|group| {
            !convention.categories.iter().any(|category| {
                category.required
                    && category.requirement_group == group.name
                    && observed.contains(category.name.as_str())
            })
        })
        .map(|group| group.missing_label.clone())
        .collect()
}
