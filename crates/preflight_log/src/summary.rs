//! Aggregated view over parsed preflight output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entry::{ErrorRecord, ResourceResult, ResourceStatus};

/// Summary of a validation run, derived from the aggregator's state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_resources: usize,
    pub successful_resources: usize,
    pub failed_resources: usize,
    pub errors: Vec<ErrorRecord>,
    pub resource_results: Vec<ResourceResult>,
}

impl Summary {
    /// Build a summary from collected errors and resource outcomes.
    pub fn from_parts(errors: Vec<ErrorRecord>, resource_results: Vec<ResourceResult>) -> Self {
        let successful_resources = resource_results
            .iter()
            .filter(|r| r.status == ResourceStatus::Success)
            .count();
        let failed_resources = resource_results
            .iter()
            .filter(|r| r.status == ResourceStatus::Failed)
            .count();

        Self {
            total_resources: resource_results.len(),
            successful_resources,
            failed_resources,
            errors,
            resource_results,
        }
    }

    /// True when no errors were reported and no resource failed.
    pub fn passed(&self) -> bool {
        self.errors.is_empty() && self.failed_resources == 0
    }

    pub fn failed(&self) -> impl Iterator<Item = &ResourceResult> {
        self.resource_results.iter().filter(|r| !r.is_success())
    }

    /// Render the summary as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Resources: {} total, {} succeeded, {} failed",
            self.total_resources, self.successful_resources, self.failed_resources
        )?;

        for result in self.failed() {
            writeln!(f, "  ✗ {}", result.resource)?;
        }

        if !self.errors.is_empty() {
            writeln!(f, "Errors: {}", self.errors.len())?;
            for error in &self.errors {
                writeln!(f, "  [{}] {}", error.timestamp, error.message.trim_end())?;
            }
        }

        if self.passed() {
            write!(f, "Preflight validation passed")
        } else {
            write!(f, "Preflight validation failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<ResourceResult> {
        vec![
            ResourceResult::new("azurerm_resource_group.main", ResourceStatus::Success),
            ResourceResult::new("azurerm_subnet.internal", ResourceStatus::Failed),
            ResourceResult::new("azurerm_key_vault.kv", ResourceStatus::Success),
        ]
    }

    #[test]
    fn test_counts_derive_from_results() {
        let summary = Summary::from_parts(Vec::new(), results());

        assert_eq!(summary.total_resources, 3);
        assert_eq!(summary.successful_resources, 2);
        assert_eq!(summary.failed_resources, 1);
        assert!(!summary.passed());
        assert_eq!(summary.failed().count(), 1);
    }

    #[test]
    fn test_default_summary_passes() {
        let summary = Summary::default();
        assert!(summary.passed());
        assert_eq!(summary.total_resources, 0);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let summary = Summary::from_parts(Vec::new(), results());
        let json = summary.to_json().unwrap();

        assert!(json.contains("\"totalResources\": 3"));
        assert!(json.contains("\"successfulResources\": 2"));
        assert!(json.contains("\"failedResources\": 1"));
        assert!(json.contains("\"resourceResults\""));
    }

    #[test]
    fn test_display_lists_failures_and_errors() {
        let errors = vec![ErrorRecord {
            level: "error".to_string(),
            message: "quota exceeded\n".to_string(),
            timestamp: "t2".to_string(),
        }];
        let rendered = Summary::from_parts(errors, results()).to_string();

        assert!(rendered.contains("3 total, 2 succeeded, 1 failed"));
        assert!(rendered.contains("✗ azurerm_subnet.internal"));
        assert!(rendered.contains("[t2] quota exceeded"));
        assert!(rendered.ends_with("Preflight validation failed"));
    }
}
