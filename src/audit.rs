//! Facade audit orchestration
//!
//! Wires the classifier, cost records and configuration together and maps
//! the ranked opportunities to an audit outcome:
//!
//! - no opportunities: not applicable (passing), no score
//! - one or more: applicable, failing with score 0

use crate::attribution::attribute_resources;
use crate::classifier::ResourceClassifier;
use crate::config::AuditConfig;
use crate::opportunity::{rank_opportunities, summarize_opportunities, Opportunity, Summary};
use crate::summary::{PageCapture, UrlCostMap};

/// Outcome of one audit run
#[derive(Debug, Clone, PartialEq)]
pub struct AuditResult {
    pub opportunities: Vec<Opportunity>,
    pub summary: Summary,
    pub is_applicable: bool,

    /// `Some(0.0)` when opportunities exist, `None` when not applicable
    pub score: Option<f64>,

    pub display_value: Option<String>,
}

impl AuditResult {
    fn not_applicable() -> Self {
        Self {
            opportunities: Vec::new(),
            summary: Summary::default(),
            is_applicable: false,
            score: None,
            display_value: None,
        }
    }

    fn from_opportunities(opportunities: Vec<Opportunity>) -> Self {
        if opportunities.is_empty() {
            return Self::not_applicable();
        }

        let summary = summarize_opportunities(&opportunities);
        let display_value = Some(display_value(opportunities.len()));
        Self {
            opportunities,
            summary,
            is_applicable: true,
            score: Some(0.0),
            display_value,
        }
    }

    /// Whether the page passes (nothing to replace)
    pub fn passed(&self) -> bool {
        !self.is_applicable
    }
}

fn display_value(count: usize) -> String {
    if count == 1 {
        "1 facade alternative available".to_string()
    } else {
        format!("{} facade alternatives available", count)
    }
}

/// Finds third-party embeds that could be lazy-loaded behind a facade
///
/// # Example
/// ```
/// use facade_finder::audit::FacadeAudit;
/// use facade_finder::classifier::EntityRegistry;
/// use facade_finder::config::AuditConfig;
/// use facade_finder::summary::{UrlCostMap, UrlCostRecord};
///
/// let registry = EntityRegistry::default_database().unwrap();
/// let audit = FacadeAudit::new(&registry, AuditConfig::default());
///
/// let mut records = UrlCostMap::new();
/// let embed = UrlCostRecord::new("https://www.youtube.com/embed/abc", 4000).with_timing(200.0, 201.0);
/// records.insert(embed.url.clone(), embed);
///
/// let result = audit.run("https://example.com/", &records);
/// assert!(result.is_applicable);
/// assert_eq!(result.score, Some(0.0));
/// ```
pub struct FacadeAudit<'c, C: ResourceClassifier + ?Sized> {
    classifier: &'c C,
    config: AuditConfig,
}

impl<'c, C: ResourceClassifier + ?Sized> FacadeAudit<'c, C> {
    pub fn new(classifier: &'c C, config: AuditConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Run the audit over already-summarized cost records
    pub fn run(&self, main_document_url: &str, records: &UrlCostMap) -> AuditResult {
        let main_entity = self.classifier.entity_of(main_document_url);
        tracing::debug!(
            main_document_url,
            main_entity = main_entity.map(|e| e.name.as_str()).unwrap_or("<none>"),
            records = records.len(),
            "running facade audit"
        );

        let sets = attribute_resources(records, self.classifier, main_entity);
        let opportunities = rank_opportunities(&sets, self.config.min_sub_item_size);

        let result = AuditResult::from_opportunities(opportunities);
        tracing::info!(
            opportunities = result.opportunities.len(),
            wasted_bytes = result.summary.wasted_bytes,
            wasted_ms = result.summary.wasted_ms,
            "facade audit complete"
        );
        result
    }

    /// Summarize a raw capture, then run the audit
    pub fn run_capture(&self, capture: &PageCapture) -> AuditResult {
        let records = capture.cost_records();
        self.run(&capture.main_document_url, &records)
    }
}
