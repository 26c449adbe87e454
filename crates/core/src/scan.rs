use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::NamingConvention;
use crate::error::{AuditError, Result};
use crate::model::Document;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub recursive: bool,
    pub convention: NamingConvention,
    /// Log a progress line every N discovered documents; 0 disables.
    pub progress_every: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            recursive: true,
            convention: NamingConvention::default(),
            progress_every: 0,
        }
    }
}

impl ScanOptions {
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            recursive,
            ..Self::default()
        }
    }
}

/// Enumerates every document under `root` carrying the convention's extension.
/// Order follows the filesystem and is not sorted here.
pub fn scan(root: &Path, recursive: bool, convention: &NamingConvention) -> Result<Vec<Document>> {
    scan_with_options(&ScanOptions {
        root: root.to_path_buf(),
        recursive,
        convention: convention.clone(),
        progress_every: 0,
    })
}

pub fn scan_with_options(options: &ScanOptions) -> Result<Vec<Document>> {
    let root = options.root.as_path();
    validate_root(root)?;

    let mut walker = WalkDir::new(root).follow_links(false);
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut documents = Vec::new();
    for item in walker {
        let entry = item.map_err(|err| AuditError::from_walk(root, err))?;
        if entry.depth() == 0 {
            continue;
        }
        if !is_regular_file(&entry) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if !options.convention.has_extension(&file_name) {
            continue;
        }

        debug!("discovered document {}", entry.path().display());
        documents.push(Document::from_path(entry.path()));

        if options.progress_every > 0 && documents.len() % options.progress_every == 0 {
            info!(
                "scan progress: {} document(s) found under {}",
                documents.len(),
                root.display()
            );
        }
    }

    info!(
        "scan complete: {} document(s) under {} (recursive: {})",
        documents.len(),
        root.display(),
        options.recursive
    );
    Ok(documents)
}

fn validate_root(root: &Path) -> Result<()> {
    match root.try_exists() {
        Ok(true) => {}
        Ok(false) | Err(_) => {
            return Err(AuditError::NotFound {
                path: root.to_path_buf(),
            })
        }
    }
    if !root.is_dir() {
        return Err(AuditError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink() && entry.path().is_file()
}
