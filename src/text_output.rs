//! Human-readable report

use crate::audit::AuditResult;
use crate::config::AuditConfig;
use crate::opportunity::SubItemSource;

/// Format bytes as KiB with one decimal
fn kib(bytes: u64) -> String {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
}

/// Render the audit result as plain text
pub fn render(main_document_url: &str, result: &AuditResult, config: &AuditConfig) -> String {
    let mut report = String::new();
    report.push_str(&format!("=== Third-Party Facades: {} ===\n", main_document_url));

    if !result.is_applicable {
        report.push_str("✓ No facade alternatives found\n");
        return report;
    }

    report.push_str(&format!(
        "⚠️  {} ({} transfer, {:.0} ms blocking)\n\n",
        result.display_value.as_deref().unwrap_or_default(),
        kib(result.summary.wasted_bytes),
        result.summary.wasted_ms
    ));

    for opportunity in &result.opportunities {
        report.push_str(&format!(
            "{} ({}) - {}, {:.0} ms blocking\n",
            opportunity.product_name,
            opportunity.entity_name,
            kib(opportunity.total_transfer_size),
            opportunity.total_blocking_time
        ));
        report.push_str(&format!(
            "   Facade: {} <{}>\n",
            opportunity.facade.name, opportunity.facade.repo
        ));
        for item in &opportunity.sub_items {
            let label = match &item.source {
                SubItemSource::Url(url) => url.as_str(),
                SubItemSource::OtherResources => config.other_resources_label.as_str(),
            };
            report.push_str(&format!(
                "   {:>10}  {:>7.0} ms  {}\n",
                kib(item.transfer_size),
                item.blocking_time,
                label
            ));
        }
        report.push('\n');
    }

    report
}
