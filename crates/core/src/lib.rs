pub mod audit;
pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod report;
pub mod scan;

pub use audit::{audit_folders, document_folders};
pub use classify::{classify, classify_with, PrefixMatcher};
pub use config::{CategoryRule, NamingConvention, RequirementGroup};
pub use error::{AuditError, Result};
pub use model::{
    AuditMetadata, AuditReport, CategoryCount, CategoryMatch, Classification, Document,
    FilenameViolation, FolderAudit, PrefixBucket, REPORT_VERSION,
};
pub use render::{render_files, render_issues, render_markdown, render_summary};
pub use report::{audit_directory, build_report, run_audit};
pub use scan::{scan, scan_with_options, ScanOptions};
