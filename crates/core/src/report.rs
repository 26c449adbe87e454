use std::path::Path;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::audit::{audit_folders, document_folders};
use crate::classify::{classify_with, PrefixMatcher};
use crate::config::NamingConvention;
use crate::error::{AuditError, Result};
use crate::model::{
    AuditMetadata, AuditReport, CategoryCount, Classification, Document, FolderAudit,
    PrefixBucket, REPORT_VERSION,
};
use crate::scan::{scan_with_options, ScanOptions};

/// Assembles the report from the three passes. Pure: sorts listings, performs no I/O.
/// Metadata is left at its default for the caller to fill in.
pub fn build_report(
    documents: &[Document],
    classifications: &[Classification],
    folder_audit: FolderAudit,
    convention: &NamingConvention,
) -> AuditReport {
    let mut files_by_prefix = convention
        .prefixes()
        .map(|(category, prefix)| PrefixBucket {
            prefix: prefix.to_string(),
            category: category.name.clone(),
            files: Vec::new(),
        })
        .collect::<Vec<_>>();

    let mut unclassified_files = Vec::new();
    let mut files_without_marker = Vec::new();
    for classification in classifications {
        let Some(matched) = &classification.matched else {
            unclassified_files.push(classification.document.display_path());
            continue;
        };
        if let Some(bucket) = files_by_prefix
            .iter_mut()
            .find(|bucket| bucket.prefix == matched.prefix)
        {
            bucket.files.push(classification.document.display_path());
        }
        if let Some(violation) = &classification.violation {
            files_without_marker.push(violation.clone());
        }
    }

    for bucket in &mut files_by_prefix {
        bucket.files.sort();
    }
    unclassified_files.sort();

    let category_counts = convention
        .categories
        .iter()
        .map(|category| CategoryCount {
            category: category.name.clone(),
            files: files_by_prefix
                .iter()
                .filter(|bucket| bucket.category == category.name)
                .map(|bucket| bucket.files.len() as u64)
                .sum(),
        })
        .collect();

    AuditReport {
        report_version: REPORT_VERSION.to_string(),
        metadata: AuditMetadata::default(),
        total_files: documents.len() as u64,
        files_by_prefix,
        category_counts,
        files_without_marker,
        folders_missing_prefixes: folder_audit,
        unclassified_files,
    }
}

/// Scans, classifies and audits `options.root` in one blocking call.
pub fn run_audit(options: &ScanOptions) -> Result<AuditReport> {
    options.convention.validate()?;
    let matcher = PrefixMatcher::new(&options.convention)?;
    let started = Instant::now();

    info!(
        "auditing {} (recursive: {})",
        options.root.display(),
        options.recursive
    );
    let documents = scan_with_options(options)?;
    let classifications = classify_with(&matcher, &documents, &options.convention);
    let folders = document_folders(&documents);
    let folder_audit = audit_folders(&classifications, &folders, &options.convention);

    let mut report = build_report(
        &documents,
        &classifications,
        folder_audit,
        &options.convention,
    );
    report.metadata = AuditMetadata {
        search_path: absolute_display(&options.root)?,
        recursive: options.recursive,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        elapsed_ms: started.elapsed().as_millis() as u64,
        scanned_folders: folders.len() as u64,
    };

    info!(
        "audit complete: {} document(s), {} categorized, {} marker issue(s), {} incomplete folder(s)",
        report.total_files,
        report.categorized_files(),
        report.files_without_marker.len(),
        report.folders_missing_prefixes.len()
    );
    Ok(report)
}

pub fn audit_directory(root: impl AsRef<Path>, recursive: bool) -> Result<AuditReport> {
    run_audit(&ScanOptions::new(root.as_ref(), recursive))
}

fn absolute_display(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path).map_err(|source| AuditError::ScanIo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(absolute.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::Path;

    use super::build_report;
    use crate::audit::{audit_folders, document_folders};
    use crate::classify::classify;
    use crate::config::NamingConvention;
    use crate::model::Document;

    #[test]
    fn buckets_are_sorted_and_violations_keep_discovery_order() {
        let convention = NamingConvention::default();
        let documents = ["/Z/01_ROE_b.pdf", "/A/01_ROE_a.pdf", "/A/notes.pdf"]
            .iter()
            .map(|path| Document::from_path(Path::new(path)))
            .collect::<Vec<_>>();
        let classifications = classify(&documents, &convention).expect("classify");
        let audit = audit_folders(&classifications, &document_folders(&documents), &convention);
        let report = build_report(&documents, &classifications, audit, &convention);

        assert_eq!(report.total_files, 3);
        assert_eq!(
            report.files_for_prefix("01_ROE_"),
            ["/A/01_ROE_a.pdf", "/Z/01_ROE_b.pdf"]
        );
        let violating = report
            .files_without_marker
            .iter()
            .map(|violation| violation.file.as_str())
            .collect::<Vec<_>>();
        assert_eq!(violating, vec!["/Z/01_ROE_b.pdf", "/A/01_ROE_a.pdf"]);
        assert_eq!(report.unclassified_files, vec!["/A/notes.pdf".to_string()]);
        assert_eq!(report.categorized_files(), 2);
        assert_eq!(
            report.folders_missing_prefixes.keys().collect::<Vec<_>>(),
            vec!["/A", "/Z"]
        );
    }

    #[test]
    fn every_configured_prefix_gets_a_bucket() {
        let convention = NamingConvention::default();
        let report = build_report(&[], &[], BTreeMap::new(), &convention);
        assert_eq!(report.files_by_prefix.len(), convention.prefixes().count());
        assert!(report.files_by_prefix.iter().all(|bucket| bucket.files.is_empty()));
        assert_eq!(report.total_files, 0);
        assert!(report.is_compliant());
    }
}
