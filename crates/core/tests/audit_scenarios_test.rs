use std::fs;
use std::path::Path;

use anyhow::Result;
use prefix_audit_core::{
    audit_directory, run_audit, AuditError, NamingConvention, ScanOptions,
};

fn touch(root: &Path, relative: &str) -> Result<String> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, b"%PDF-1.4")?;
    Ok(path.to_string_lossy().to_string())
}

fn folder(root: &Path, relative: &str) -> String {
    root.join(relative).to_string_lossy().to_string()
}

#[test]
fn complete_folder_without_markers() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let roe = touch(dir.path(), "A/01_ROE_x.pdf")?;
    let id = touch(dir.path(), "A/02_ID_y.pdf")?;
    let title = touch(dir.path(), "A/04_TITLE_z.pdf")?;

    let report = audit_directory(dir.path(), true)?;

    assert_eq!(report.total_files, 3);
    assert_eq!(report.files_for_prefix("01_ROE_"), [roe.clone()]);
    assert_eq!(report.files_for_prefix("02_ID_"), [id.clone()]);
    assert_eq!(report.files_for_prefix("04_TITLE_"), [title.clone()]);

    let mut flagged = report
        .files_without_marker
        .iter()
        .map(|violation| violation.file.clone())
        .collect::<Vec<_>>();
    flagged.sort();
    let mut expected = vec![roe, id, title];
    expected.sort();
    assert_eq!(flagged, expected);

    assert!(!report
        .folders_missing_prefixes
        .contains_key(&folder(dir.path(), "A")));
    Ok(())
}

#[test]
fn folder_with_only_unclassified_documents() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let readme = touch(dir.path(), "B/readme.pdf")?;

    let report = audit_directory(dir.path(), true)?;

    assert_eq!(report.total_files, 1);
    assert!(report
        .files_by_prefix
        .iter()
        .all(|bucket| bucket.files.is_empty()));
    assert!(report.files_without_marker.is_empty());
    assert_eq!(report.unclassified_files, vec![readme]);
    assert_eq!(
        report.folders_missing_prefixes.get(&folder(dir.path(), "B")),
        Some(&NamingConvention::default().missing_labels())
    );
    Ok(())
}

#[test]
fn marker_present_and_only_id_satisfied() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = touch(dir.path(), "C/02_IDs_TT-BC_file.pdf")?;

    let report = audit_directory(dir.path(), true)?;

    assert_eq!(report.files_for_prefix("02_IDs_"), [file]);
    assert!(report.files_without_marker.is_empty());
    assert_eq!(
        report.folders_missing_prefixes.get(&folder(dir.path(), "C")),
        Some(&vec![
            "01_ROE_".to_string(),
            "04_TITLE_ or 04_DEED_".to_string()
        ])
    );
    Ok(())
}

#[test]
fn total_counts_every_document_and_empty_folders_are_ignored() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(dir.path(), "A/01_ROE_TT-BC.pdf")?;
    touch(dir.path(), "A/unrelated.pdf")?;
    touch(dir.path(), "A/deep/02_id_JohnDoe.PDF")?;
    touch(dir.path(), "A/notes.txt")?;
    fs::create_dir_all(dir.path().join("Empty"))?;
    touch(dir.path(), "OnlyText/readme.txt")?;

    let report = audit_directory(dir.path(), true)?;

    assert_eq!(report.total_files, 3);
    assert_eq!(report.categorized_files(), 2);
    assert_eq!(report.files_for_prefix("02_ID_").len(), 1);
    assert!(!report
        .folders_missing_prefixes
        .contains_key(&folder(dir.path(), "Empty")));
    assert!(!report
        .folders_missing_prefixes
        .contains_key(&folder(dir.path(), "OnlyText")));
    assert_eq!(report.metadata.scanned_folders, 2);
    Ok(())
}

#[test]
fn non_recursive_audit_only_sees_direct_children() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(dir.path(), "01_ROE_TT-BC_root.pdf")?;
    touch(dir.path(), "Sub/readme.pdf")?;

    let report = audit_directory(dir.path(), false)?;

    assert_eq!(report.total_files, 1);
    assert!(!report.metadata.recursive);
    let root_key = dir.path().to_string_lossy().to_string();
    assert_eq!(
        report.folders_missing_prefixes.keys().collect::<Vec<_>>(),
        vec![&root_key]
    );
    Ok(())
}

#[test]
fn repeated_audits_produce_identical_findings() -> Result<()> {
    let dir = tempfile::tempdir()?;
    for relative in [
        "X/01_ROE_a.pdf",
        "X/02_ID2_b.pdf",
        "Y/04_DEED_TT-BC.pdf",
        "Y/04_TITLE_c.pdf",
        "Z/misc.pdf",
    ] {
        touch(dir.path(), relative)?;
    }

    let first = audit_directory(dir.path(), true)?;
    let second = audit_directory(dir.path(), true)?;

    assert_eq!(first.total_files, second.total_files);
    assert_eq!(first.files_by_prefix, second.files_by_prefix);
    assert_eq!(first.category_counts, second.category_counts);
    assert_eq!(first.folders_missing_prefixes, second.folders_missing_prefixes);
    assert_eq!(first.unclassified_files, second.unclassified_files);

    let mut first_flags = first.files_without_marker.clone();
    let mut second_flags = second.files_without_marker.clone();
    first_flags.sort_by(|a, b| a.file.cmp(&b.file));
    second_flags.sort_by(|a, b| a.file.cmp(&b.file));
    assert_eq!(first_flags, second_flags);
    Ok(())
}

#[test]
fn missing_root_fails_without_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = audit_directory(dir.path().join("missing"), true);
    assert!(matches!(result, Err(AuditError::NotFound { .. })));
}

#[test]
fn invalid_convention_is_rejected_before_scanning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut convention = NamingConvention::default();
    convention.categories.clear();
    let options = ScanOptions {
        convention,
        ..ScanOptions::new(dir.path().join("missing"), true)
    };
    assert!(matches!(run_audit(&options), Err(AuditError::Config(_))));
}

#[test]
fn report_round_trips_through_json() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(dir.path(), "A/01_ROE_x.pdf")?;
    let report = audit_directory(dir.path(), true)?;

    let payload = serde_json::to_string_pretty(&report)?;
    let parsed: prefix_audit_core::AuditReport = serde_json::from_str(&payload)?;
    assert_eq!(parsed, report);
    Ok(())
}
