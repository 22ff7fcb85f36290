//! JSON output format for facade audit reports

use crate::audit::AuditResult;
use crate::config::AuditConfig;
use crate::opportunity::{Opportunity, SubItem, SubItemSource};
use serde::{Deserialize, Serialize};

/// Suggested facade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFacade {
    pub name: String,
    /// Reference link (usually the source repository)
    pub link: String,
}

/// A resource row under an opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSubItem {
    /// Resource URL, or the "Other resources" label for the condensed row
    pub url: String,
    /// Bytes transferred
    pub transfer_size: u64,
    /// Main-thread blocking time in milliseconds
    pub blocking_time: f64,
    /// Main-thread time in milliseconds
    pub main_thread_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_start_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_end_time: Option<f64>,
}

/// One facadable product and what it costs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOpportunity {
    pub product: String,
    pub entity: String,
    pub facade: JsonFacade,
    pub transfer_size: u64,
    pub blocking_time: f64,
    pub main_thread_time: f64,
    pub sub_items: Vec<JsonSubItem>,
}

/// Totals over all opportunities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub wasted_bytes: u64,
    pub wasted_ms: f64,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Format version identifier
    pub version: String,
    /// Audited page
    pub main_document_url: String,
    pub is_applicable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    pub summary: JsonSummary,
    pub opportunities: Vec<JsonOpportunity>,
}

impl JsonReport {
    pub fn new(main_document_url: &str, result: &AuditResult, config: &AuditConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            main_document_url: main_document_url.to_string(),
            is_applicable: result.is_applicable,
            score: result.score,
            display_value: result.display_value.clone(),
            summary: JsonSummary {
                wasted_bytes: result.summary.wasted_bytes,
                wasted_ms: result.summary.wasted_ms,
            },
            opportunities: result
                .opportunities
                .iter()
                .map(|o| JsonOpportunity::from_opportunity(o, config))
                .collect(),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl JsonOpportunity {
    fn from_opportunity(opportunity: &Opportunity, config: &AuditConfig) -> Self {
        Self {
            product: opportunity.product_name.clone(),
            entity: opportunity.entity_name.clone(),
            facade: JsonFacade {
                name: opportunity.facade.name.clone(),
                link: opportunity.facade.repo.clone(),
            },
            transfer_size: opportunity.total_transfer_size,
            blocking_time: opportunity.total_blocking_time,
            main_thread_time: opportunity.total_main_thread_time,
            sub_items: opportunity
                .sub_items
                .iter()
                .map(|item| JsonSubItem::from_sub_item(item, config))
                .collect(),
        }
    }
}

impl JsonSubItem {
    fn from_sub_item(item: &SubItem, config: &AuditConfig) -> Self {
        let url = match &item.source {
            SubItemSource::Url(url) => url.clone(),
            SubItemSource::OtherResources => config.other_resources_label.clone(),
        };
        Self {
            url,
            transfer_size: item.transfer_size,
            blocking_time: item.blocking_time,
            main_thread_time: item.main_thread_time,
            first_start_time: item.first_start_time,
            first_end_time: item.first_end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::FacadeAudit;
    use crate::classifier::EntityRegistry;
    use crate::summary::{UrlCostMap, UrlCostRecord};

    #[test]
    fn test_not_applicable_report() {
        let registry = EntityRegistry::default_database().unwrap();
        let audit = FacadeAudit::new(&registry, AuditConfig::default());
        let result = audit.run("https://example.com/", &UrlCostMap::new());

        let report = JsonReport::new("https://example.com/", &result, audit.config());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"is_applicable\": false"));
        assert!(!json.contains("\"score\""));
    }

    #[test]
    fn test_other_resources_uses_label() {
        let registry = EntityRegistry::default_database().unwrap();
        let config = AuditConfig {
            other_resources_label: "Everything else".to_string(),
            ..AuditConfig::default()
        };
        let audit = FacadeAudit::new(&registry, config);

        let records: UrlCostMap = [
            UrlCostRecord::new("https://www.youtube.com/embed/abc", 4000).with_timing(200.0, 201.0),
            UrlCostRecord::new("https://i.ytimg.com/generate_204", 30).with_timing(300.0, 300.5),
        ]
        .into_iter()
        .map(|r| (r.url.clone(), r))
        .collect();
        let result = audit.run("https://example.com/", &records);

        let report = JsonReport::new("https://example.com/", &result, audit.config());
        let items = &report.opportunities[0].sub_items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].url, "Everything else");
        assert!(items[1].first_start_time.is_none());

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["summary"]["wasted_bytes"], 4030);
        assert_eq!(value["opportunities"][0]["facade"]["name"], "Lite YouTube");
    }
}
