//! Report metadata lookup (documentation for reports and their metrics).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Documentation attached to a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportMetadata {
    pub documentation: Option<String>,
    pub metrics_documentation: Option<BTreeMap<String, String>>,
}

/// Source of report metadata, keyed by controller module and action.
pub trait MetadataProvider {
    fn report_metadata(&self, module: &str, action: &str) -> Option<ReportMetadata>;
}

/// Metadata held in memory, keyed by `module.action`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticMetadata {
    reports: BTreeMap<String, ReportMetadata>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `"module.action": { documentation, metricsDocumentation }`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_report(
        mut self,
        module: &str,
        action: &str,
        metadata: ReportMetadata,
    ) -> Self {
        self.reports.insert(format!("{module}.{action}"), metadata);
        self
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl MetadataProvider for StaticMetadata {
    fn report_metadata(&self, module: &str, action: &str) -> Option<ReportMetadata> {
        self.reports.get(&format!("{module}.{action}")).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_camel_case_json() {
        let metadata = StaticMetadata::from_json(
            r#"{
                "Referrers.getKeywords": {
                    "documentation": "Keywords used to find the site.",
                    "metricsDocumentation": { "nb_visits": "Number of visits." }
                },
                "Actions.getPageUrls": {}
            }"#,
        )
        .unwrap();
        let keywords = metadata
            .report_metadata("Referrers", "getKeywords")
            .unwrap();
        assert_eq!(
            keywords.documentation.as_deref(),
            Some("Keywords used to find the site.")
        );
        assert_eq!(
            keywords.metrics_documentation.unwrap()["nb_visits"],
            "Number of visits."
        );
        let pages = metadata.report_metadata("Actions", "getPageUrls").unwrap();
        assert!(pages.documentation.is_none());
        assert!(metadata.report_metadata("Goals", "get").is_none());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(StaticMetadata::from_json("[1, 2").is_err());
    }
}
