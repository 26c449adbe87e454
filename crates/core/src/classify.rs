use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::NamingConvention;
use crate::error::{AuditError, Result};
use crate::model::{CategoryMatch, Classification, Document, FilenameViolation};

/// Compiled form of the convention's prefix table.
///
/// Each prefix becomes the case-insensitive glob `<prefix>*<extension>`, anchored at
/// the start of the file name. Glob indices follow priority order, so the lowest
/// matching index is the winning prefix.
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    globset: GlobSet,
    entries: Vec<CategoryMatch>,
}

impl PrefixMatcher {
    pub fn new(convention: &NamingConvention) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut entries = Vec::new();

        for (category, prefix) in convention.prefixes() {
            let pattern = format!(
                "{}*{}",
                globset::escape(prefix),
                globset::escape(&convention.extension)
            );
            let glob = GlobBuilder::new(&pattern)
                .case_insensitive(true)
                .literal_separator(false)
                .build()
                .map_err(|err| {
                    AuditError::Config(format!("prefix '{prefix}' does not compile: {err}"))
                })?;
            builder.add(glob);
            entries.push(CategoryMatch {
                category: category.name.clone(),
                prefix: prefix.to_string(),
            });
        }

        let globset = builder
            .build()
            .map_err(|err| AuditError::Config(format!("failed to compile prefix table: {err}")))?;
        Ok(Self { globset, entries })
    }

    /// First prefix, in priority order, that `file_name` satisfies.
    pub fn match_name(&self, file_name: &str) -> Option<&CategoryMatch> {
        self.globset
            .matches(file_name)
            .into_iter()
            .min()
            .and_then(|index| self.entries.get(index))
    }
}

/// Pairs every document with at most one category and applies the marker rule
/// to matched documents. Output order is discovery order.
pub fn classify(documents: &[Document], convention: &NamingConvention) -> Result<Vec<Classification>> {
    let matcher = PrefixMatcher::new(convention)?;
    Ok(classify_with(&matcher, documents, convention))
}

pub fn classify_with(
    matcher: &PrefixMatcher,
    documents: &[Document],
    convention: &NamingConvention,
) -> Vec<Classification> {
    documents
        .iter()
        .map(|document| {
            let matched = matcher.match_name(&document.file_name).cloned();
            let violation = matched.as_ref().and_then(|matched| {
                check_marker(document, matched, convention)
            });
            debug!(
                "classified {} as {}",
                document.path.display(),
                matched
                    .as_ref()
                    .map(|matched| matched.prefix.as_str())
                    .unwrap_or("unclassified")
            );
            Classification {
                document: document.clone(),
                matched,
                violation,
            }
        })
        .collect()
}

fn check_marker(
    document: &Document,
    matched: &CategoryMatch,
    convention: &NamingConvention,
) -> Option<FilenameViolation> {
    if document.file_name.contains(&convention.marker_token) {
        return None;
    }
    Some(FilenameViolation {
        file: document.display_path(),
        category: matched.category.clone(),
        prefix: matched.prefix.clone(),
        issue: convention.marker_issue.clone(),
    })
}
