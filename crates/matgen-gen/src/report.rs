//! Outcome of a batch run

use serde::Serialize;
use std::fmt;

/// A per-item problem. None of these stop the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemIssue {
    /// Base image could not be loaded; item skipped
    LoadFailure { path: String },
    /// Requested slot missing; `fallback` is where the image went instead, if anywhere
    PropertyNotFound {
        item: String,
        property: String,
        fallback: Option<String>,
    },
    /// Companion matched by name but could not be loaded; artifact has the base only
    MissingCompanion { item: String, companion: String },
    /// An earlier item in the same run already claimed this output path; item skipped
    DuplicateOutput { item: String, output: String },
    /// The store refused a write or metadata edit; item skipped
    ItemFailure { item: String, cause: String },
}

impl ItemIssue {
    /// Failures skipped their item; everything else is a warning
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ItemIssue::LoadFailure { .. } | ItemIssue::DuplicateOutput { .. } | ItemIssue::ItemFailure { .. }
        )
    }
}

impl fmt::Display for ItemIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemIssue::LoadFailure { path } => write!(f, "could not load image {}", path),
            ItemIssue::PropertyNotFound {
                item,
                property,
                fallback: Some(slot),
            } => write!(f, "{}: no property '{}', used '{}'", item, property, slot),
            ItemIssue::PropertyNotFound {
                item,
                property,
                fallback: None,
            } => write!(f, "{}: no property '{}', binding skipped", item, property),
            ItemIssue::MissingCompanion { item, companion } => {
                write!(f, "{}: companion {} could not be loaded", item, companion)
            }
            ItemIssue::DuplicateOutput { item, output } => {
                write!(f, "{}: {} was already produced by another texture in this run", item, output)
            }
            ItemIssue::ItemFailure { item, cause } => write!(f, "{}: {}", item, cause),
        }
    }
}

/// Summary of one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Store paths of artifacts written
    pub created: Vec<String>,
    /// Store paths left untouched because an artifact already existed
    pub skipped_existing: Vec<String>,
    /// Import setting edits made on source images
    pub metadata_edits: usize,
    pub issues: Vec<ItemIssue>,
    /// Set when the final flush failed; artifacts may still have been written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persist_error: Option<String>,
}

impl RunReport {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_existing.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemIssue> {
        self.issues.iter().filter(|i| i.is_failure())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ItemIssue> {
        self.issues.iter().filter(|i| !i.is_failure())
    }

    /// No failures, no warnings, and the flush succeeded
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.persist_error.is_none()
    }

    pub(crate) fn record(&mut self, issue: ItemIssue) {
        if issue.is_failure() {
            tracing::error!("{}", issue);
        } else {
            tracing::warn!("{}", issue);
        }
        self.issues.push(issue);
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} created, {} skipped (existing), {} failed, {} warning(s)",
            self.created_count(),
            self.skipped_count(),
            self.failed_count(),
            self.warnings().count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_classification() {
        let mut report = RunReport::default();
        report.created.push("Out/M_rock.mat".to_string());
        report.skipped_existing.push("Out/M_wood.mat".to_string());
        report.record(ItemIssue::LoadFailure {
            path: "In/broken.png".to_string(),
        });
        report.record(ItemIssue::PropertyNotFound {
            item: "In/rock.png".to_string(),
            property: "_Albedo".to_string(),
            fallback: Some("_MainTex".to_string()),
        });

        assert_eq!(report.created_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.warnings().count(), 1);
        assert!(!report.is_clean());
        assert_eq!(
            report.summary(),
            "1 created, 1 skipped (existing), 1 failed, 1 warning(s)"
        );
    }

    #[test]
    fn test_issue_display_and_item() {
        let issue = ItemIssue::PropertyNotFound {
            item: "In/rock.png".to_string(),
            property: "_NormalTex".to_string(),
            fallback: None,
        };
        assert_eq!(
            issue.to_string(),
            "In/rock.png: no property '_NormalTex', binding skipped"
        );
        assert!(!issue.is_failure());

        let duplicate = ItemIssue::DuplicateOutput {
            item: "In/B/rock.tga".to_string(),
            output: "Out/rock.mat".to_string(),
        };
        assert!(duplicate.is_failure());
        assert_eq!(
            duplicate.to_string(),
            "In/B/rock.tga: Out/rock.mat was already produced by another texture in this run"
        );
    }

    #[test]
    fn test_empty_report_is_clean() {
        assert!(RunReport::default().is_clean());
    }
}
