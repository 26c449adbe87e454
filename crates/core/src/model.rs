use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const REPORT_VERSION: &str = "1.0.0";

/// A discovered document. Folder identity is the parent path string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub file_name: String,
    pub folder: String,
}

impl Document {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let folder = path
            .parent()
            .map(|parent| parent.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            file_name,
            folder,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryMatch {
    pub category: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub document: Document,
    pub matched: Option<CategoryMatch>,
    /// Set only for matched documents whose name lacks the marker token.
    pub violation: Option<FilenameViolation>,
}

impl Classification {
    pub fn is_classified(&self) -> bool {
        self.matched.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilenameViolation {
    pub file: String,
    pub category: String,
    pub prefix: String,
    pub issue: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrefixBucket {
    pub prefix: String,
    pub category: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub files: u64,
}

/// Folder path -> missing requirement labels, keys in sorted order.
pub type FolderAudit = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditMetadata {
    pub search_path: String,
    pub recursive: bool,
    pub generated_at: String,
    #[serde(default)]
    pub elapsed_ms: u64,
    #[serde(default)]
    pub scanned_folders: u64,
}

impl Default for AuditMetadata {
    fn default() -> Self {
        Self {
            search_path: String::new(),
            recursive: true,
            generated_at: String::new(),
            elapsed_ms: 0,
            scanned_folders: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditReport {
    pub report_version: String,
    #[serde(default)]
    pub metadata: AuditMetadata,
    pub total_files: u64,
    pub files_by_prefix: Vec<PrefixBucket>,
    #[serde(default)]
    pub category_counts: Vec<CategoryCount>,
    #[serde(alias = "files_without_tt")]
    pub files_without_marker: Vec<FilenameViolation>,
    pub folders_missing_prefixes: FolderAudit,
    #[serde(default)]
    pub unclassified_files: Vec<String>,
}

impl AuditReport {
    pub fn files_for_prefix(&self, prefix: &str) -> &[String] {
        self.files_by_prefix
            .iter()
            .find(|bucket| bucket.prefix == prefix)
            .map(|bucket| bucket.files.as_slice())
            .unwrap_or(&[])
    }

    pub fn categorized_files(&self) -> u64 {
        self.category_counts.iter().map(|count| count.files).sum()
    }

    pub fn is_compliant(&self) -> bool {
        self.files_without_marker.is_empty() && self.folders_missing_prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{AuditReport, Document};

    #[test]
    fn document_splits_name_and_folder() {
        let document = Document::from_path(Path::new("/deals/A/01_ROE_x.pdf"));
        assert_eq!(document.file_name, "01_ROE_x.pdf");
        assert_eq!(document.folder, "/deals/A");
    }

    #[test]
    fn legacy_marker_field_name_is_accepted() {
        let report: AuditReport = serde_json::from_str(
            r#"{
                "report_version": "1.0.0",
                "total_files": 1,
                "files_by_prefix": [
                    { "prefix": "01_ROE_", "category": "ROE", "files": ["/A/01_ROE_x.pdf"] }
                ],
                "files_without_tt": [
                    {
                        "file": "/A/01_ROE_x.pdf",
                        "category": "ROE",
                        "prefix": "01_ROE_",
                        "issue": "TT-BC not found anywhere in file name"
                    }
                ],
                "folders_missing_prefixes": {}
            }"#,
        )
        .expect("report parses");

        assert_eq!(report.files_without_marker.len(), 1);
        assert_eq!(report.files_for_prefix("01_ROE_"), ["/A/01_ROE_x.pdf"]);
        assert!(report.files_for_prefix("02_ID_").is_empty());
        assert!(!report.is_compliant());
        assert!(report.metadata.recursive);
    }
}
