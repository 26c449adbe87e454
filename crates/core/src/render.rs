use crate::model::AuditReport;

const RULE: &str = "==================================================";

pub fn render_summary(report: &AuditReport) -> String {
    let mut out = String::new();
    out.push_str("ANALYSIS SUMMARY\n");
    out.push_str(RULE);
    out.push_str("\n\n");
    out.push_str(&format!("Search path: {}\n", report.metadata.search_path));
    out.push_str(&format!("Total PDF files found: {}\n\n", report.total_files));

    out.push_str("Files by category:\n");
    for count in &report.category_counts {
        out.push_str(&format!(
            "- {} files ({}): {}\n",
            count.category,
            category_prefixes(report, &count.category).join("/"),
            count.files
        ));
    }
    out.push_str(&format!(
        "- Total categorized files: {}\n\n",
        report.categorized_files()
    ));

    out.push_str("Issues found:\n");
    out.push_str(&format!(
        "- Files missing the marker token: {}\n",
        report.files_without_marker.len()
    ));
    out.push_str(&format!(
        "- Folders with missing files and/or naming convention errors: {}\n\n",
        report.folders_missing_prefixes.len()
    ));

    if report.is_compliant() {
        out.push_str("All files and folders are compliant.\n");
    } else {
        out.push_str("Issues found; see the issues listing for details.\n");
    }
    out
}

pub fn render_files(report: &AuditReport) -> String {
    let mut out = String::new();
    out.push_str("FILES FOUND BY PREFIX\n");
    out.push_str(RULE);
    out.push_str("\n\n");

    for count in &report.category_counts {
        let buckets = report
            .files_by_prefix
            .iter()
            .filter(|bucket| bucket.category == count.category)
            .collect::<Vec<_>>();

        if let [bucket] = buckets.as_slice() {
            out.push_str(&format!(
                "{} files: ({} found)\n",
                bucket.prefix,
                bucket.files.len()
            ));
            if bucket.files.is_empty() {
                out.push_str("  None found\n");
            }
            for file in &bucket.files {
                out.push_str(&format!("  - {}\n", file));
            }
            out.push('\n');
            continue;
        }

        out.push_str(&format!(
            "{} files ({}):\n",
            count.category,
            category_prefixes(report, &count.category).join("/")
        ));
        for bucket in buckets.iter().filter(|bucket| !bucket.files.is_empty()) {
            out.push_str(&format!(
                "  {} files: ({} found)\n",
                bucket.prefix,
                bucket.files.len()
            ));
            for file in &bucket.files {
                out.push_str(&format!("    - {}\n", file));
            }
        }
        if count.files == 0 {
            out.push_str("  None found\n");
        } else {
            out.push_str(&format!("  Total {} files: {}\n", count.category, count.files));
        }
        out.push('\n');
    }

    if !report.unclassified_files.is_empty() {
        out.push_str(&format!(
            "Unclassified files: ({} found)\n",
            report.unclassified_files.len()
        ));
        for file in &report.unclassified_files {
            out.push_str(&format!("  - {}\n", file));
        }
    }
    out
}

pub fn render_issues(report: &AuditReport) -> String {
    if report.is_compliant() {
        return "No issues found. All files and folders are compliant.\n".to_string();
    }

    let mut out = String::new();
    if !report.files_without_marker.is_empty() {
        out.push_str("FILES MISSING THE MARKER TOKEN\n");
        out.push_str(RULE);
        out.push_str("\n\n");
        for violation in &report.files_without_marker {
            out.push_str(&format!("x {}\n", violation.file));
            out.push_str(&format!("   Issue: {}\n\n", violation.issue));
        }
        out.push_str(&format!(
            "Total files with marker issues: {}\n\n",
            report.files_without_marker.len()
        ));
    }

    if !report.folders_missing_prefixes.is_empty() {
        out.push_str("FOLDERS MISSING REQUIRED PREFIXES\n");
        out.push_str(RULE);
        out.push('\n');
        for (folder, missing) in &report.folders_missing_prefixes {
            out.push_str(&format!("> {}\n", folder));
            out.push_str(&format!("   Missing: {}\n\n", missing.join(", ")));
        }
        out.push_str(&format!(
            "Total incomplete folders: {}\n",
            report.folders_missing_prefixes.len()
        ));
    }
    out
}

pub fn render_markdown(report: &AuditReport) -> String {
    let mut out = String::new();
    out.push_str("# Prefix Audit Report\n\n");
    out.push_str(&format!(
        "- Report version: `{}`\n- Generated at: `{}`\n- Search path: `{}`\n- Recursive: `{}`\n- Elapsed: `{} ms`\n\n",
        report.report_version,
        report.metadata.generated_at,
        report.metadata.search_path,
        report.metadata.recursive,
        report.metadata.elapsed_ms
    ));

    out.push_str("## Summary\n\n");
    out.push_str(&format!(
        "- Documents: {}\n- Folders with documents: {}\n- Categorized: {}\n- Unclassified: {}\n",
        report.total_files,
        report.metadata.scanned_folders,
        report.categorized_files(),
        report.unclassified_files.len()
    ));
    for count in &report.category_counts {
        out.push_str(&format!("- `{}`: {} file(s)\n", count.category, count.files));
    }
    out.push('\n');

    out.push_str("## Files by Prefix\n\n");
    for bucket in &report.files_by_prefix {
        out.push_str(&format!(
            "### `{}` ({})\n\n",
            bucket.prefix,
            bucket.files.len()
        ));
        if bucket.files.is_empty() {
            out.push_str("None found.\n\n");
            continue;
        }
        for file in &bucket.files {
            out.push_str(&format!("- `{}`\n", file));
        }
        out.push('\n');
    }

    out.push_str("## Marker Issues\n\n");
    if report.files_without_marker.is_empty() {
        out.push_str("No marker issues.\n\n");
    } else {
        for violation in &report.files_without_marker {
            out.push_str(&format!(
                "- `{}` (`{}`): {}\n",
                violation.file, violation.prefix, violation.issue
            ));
        }
        out.push('\n');
    }

    out.push_str("## Incomplete Folders\n\n");
    if report.folders_missing_prefixes.is_empty() {
        out.push_str("All folders are complete.\n");
    } else {
        for (folder, missing) in &report.folders_missing_prefixes {
            out.push_str(&format!("- `{}`: missing {}\n", folder, missing.join(", ")));
        }
    }

    out
}

fn category_prefixes<'a>(report: &'a AuditReport, category: &str) -> Vec<&'a str> {
    report
        .files_by_prefix
        .iter()
        .filter(|bucket| bucket.category == category)
        .map(|bucket| bucket.prefix.as_str())
        .collect()
}
