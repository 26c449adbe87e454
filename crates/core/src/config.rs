use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AuditError, Result};

pub const DEFAULT_EXTENSION: &str = ".pdf";
pub const DEFAULT_MARKER_TOKEN: &str = "TT-BC";
pub const DEFAULT_MARKER_ISSUE: &str = "TT-BC not found anywhere in file name";

/// Ordered naming-convention table. Category order is classification priority,
/// requirement order is the order missing requirements are reported in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamingConvention {
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_marker_token")]
    pub marker_token: String,
    #[serde(default = "default_marker_issue")]
    pub marker_issue: String,
    pub categories: Vec<CategoryRule>,
    pub requirements: Vec<RequirementGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub prefixes: Vec<String>,
    #[serde(default = "default_required")]
    pub required: bool,
    pub requirement_group: String,
}

/// A logical requirement a folder must satisfy. Any required category that
/// names this group satisfies it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequirementGroup {
    pub name: String,
    pub missing_label: String,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_marker_token() -> String {
    DEFAULT_MARKER_TOKEN.to_string()
}

fn default_marker_issue() -> String {
    DEFAULT_MARKER_ISSUE.to_string()
}

fn default_required() -> bool {
    true
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            marker_token: default_marker_token(),
            marker_issue: default_marker_issue(),
            categories: vec![
                CategoryRule::new("ROE", &["01_ROE_"], "ROE"),
                CategoryRule::new("ID", &["02_ID_", "02_IDs_", "02_ID1_", "02_ID2_"], "ID"),
                CategoryRule::new("TITLE", &["04_TITLE_", "04_DEED_", "04_TITLE-"], "TITLE"),
            ],
            requirements: vec![
                RequirementGroup::new("ROE", "01_ROE_"),
                RequirementGroup::new("ID", "02_ID_ (or ID1_/ID2_/IDs_)"),
                RequirementGroup::new("TITLE", "04_TITLE_ or 04_DEED_"),
            ],
        }
    }
}

impl CategoryRule {
    pub fn new(name: &str, prefixes: &[&str], requirement_group: &str) -> Self {
        Self {
            name: name.to_string(),
            prefixes: prefixes.iter().map(|prefix| prefix.to_string()).collect(),
            required: true,
            requirement_group: requirement_group.to_string(),
        }
    }
}

impl RequirementGroup {
    pub fn new(name: &str, missing_label: &str) -> Self {
        Self {
            name: name.to_string(),
            missing_label: missing_label.to_string(),
        }
    }
}

impl NamingConvention {
    /// Loads and validates a convention from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| AuditError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let convention: Self = serde_json::from_str(&content)?;
        convention.validate()?;
        info!(
            "loaded naming convention from {} ({} categories)",
            path.display(),
            convention.categories.len()
        );
        Ok(convention)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| AuditError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.extension.trim().is_empty() {
            return Err(AuditError::Config("extension must not be empty".to_string()));
        }
        if self.marker_token.is_empty() {
            return Err(AuditError::Config(
                "marker_token must not be empty".to_string(),
            ));
        }
        if self.categories.is_empty() {
            return Err(AuditError::Config(
                "at least one category is required".to_string(),
            ));
        }

        let group_names = self
            .requirements
            .iter()
            .map(|group| group.name.as_str())
            .collect::<HashSet<_>>();
        if group_names.len() != self.requirements.len() {
            return Err(AuditError::Config(
                "requirement group names must be unique".to_string(),
            ));
        }

        let mut seen_prefixes = HashSet::new();
        for category in &self.categories {
            if category.prefixes.is_empty() {
                return Err(AuditError::Config(format!(
                    "category '{}' has no prefixes",
                    category.name
                )));
            }
            for prefix in &category.prefixes {
                if prefix.is_empty() {
                    return Err(AuditError::Config(format!(
                        "category '{}' has an empty prefix",
                        category.name
                    )));
                }
                if !seen_prefixes.insert(prefix.as_str()) {
                    return Err(AuditError::Config(format!(
                        "prefix '{prefix}' is declared more than once"
                    )));
                }
            }
            if category.required && !group_names.contains(category.requirement_group.as_str()) {
                return Err(AuditError::Config(format!(
                    "category '{}' names unknown requirement group '{}'",
                    category.name, category.requirement_group
                )));
            }
        }

        for group in &self.requirements {
            let served = self
                .categories
                .iter()
                .any(|category| category.required && category.requirement_group == group.name);
            if !served {
                return Err(AuditError::Config(format!(
                    "requirement group '{}' is not served by any required category",
                    group.name
                )));
            }
        }

        Ok(())
    }

    /// Every configured prefix, in classification priority order.
    pub fn prefixes(&self) -> impl Iterator<Item = (&CategoryRule, &str)> {
        self.categories.iter().flat_map(|category| {
            category
                .prefixes
                .iter()
                .map(move |prefix| (category, prefix.as_str()))
        })
    }

    pub fn category(&self, name: &str) -> Option<&CategoryRule> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn missing_labels(&self) -> Vec<String> {
        self.requirements
            .iter()
            .map(|group| group.missing_label.clone())
            .collect()
    }

    pub(crate) fn has_extension(&self, file_name: &str) -> bool {
        file_name
            .to_lowercase()
            .ends_with(&self.extension.to_lowercase())
    }
}
