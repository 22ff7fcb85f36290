//! Aggregation and ranking of facade opportunities
//!
//! Turns attribution sets into report rows: per-product totals, sub-items
//! sorted by size, small sub-items condensed into one trailing entry, and the
//! suggested facade. Condensation is a separate final stage so it never
//! affects the totals.

use crate::attribution::{AttributionSet, AttributionSets};
use crate::classifier::Facade;
use crate::summary::UrlCostRecord;

/// Sub-items smaller than this are folded into "Other resources"
pub const DEFAULT_MIN_SUB_ITEM_SIZE: u64 = 1024;

/// What a sub-item row refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubItemSource {
    Url(String),
    /// Synthetic row summing condensed small resources
    OtherResources,
}

/// One resource (or the condensed remainder) under an opportunity
#[derive(Debug, Clone, PartialEq)]
pub struct SubItem {
    pub source: SubItemSource,
    pub transfer_size: u64,
    pub blocking_time: f64,
    pub main_thread_time: f64,
    pub first_start_time: Option<f64>,
    pub first_end_time: Option<f64>,
}

impl SubItem {
    fn from_record(record: &UrlCostRecord) -> Self {
        Self {
            source: SubItemSource::Url(record.url.clone()),
            transfer_size: record.transfer_size,
            blocking_time: record.blocking_time,
            main_thread_time: record.main_thread_time,
            first_start_time: record.first_start_time,
            first_end_time: record.first_end_time,
        }
    }

    pub fn is_other_resources(&self) -> bool {
        self.source == SubItemSource::OtherResources
    }
}

/// A product that could be replaced by a facade, with what it costs
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub product_name: String,
    pub entity_name: String,
    pub facade: Facade,
    pub total_transfer_size: u64,
    pub total_blocking_time: f64,
    pub total_main_thread_time: f64,
    pub sub_items: Vec<SubItem>,
}

/// Savings over all opportunities
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub wasted_bytes: u64,
    pub wasted_ms: f64,
}

/// Build the report row for one attribution set
///
/// Returns `None` for an empty set or a product with no facade.
pub fn build_opportunity(set: &AttributionSet<'_>, min_sub_item_size: u64) -> Option<Opportunity> {
    if set.is_empty() {
        return None;
    }
    let facade = set.product.suggested_facade()?.clone();

    let mut total_transfer_size = 0u64;
    let mut total_blocking_time = 0.0;
    let mut total_main_thread_time = 0.0;
    let mut items = Vec::with_capacity(set.len());

    for record in set.members() {
        total_transfer_size = total_transfer_size.saturating_add(record.transfer_size);
        total_blocking_time += record.blocking_time;
        total_main_thread_time += record.main_thread_time;
        items.push(SubItem::from_record(record));
    }

    sort_by_transfer_size(&mut items);

    Some(Opportunity {
        product_name: set.product.name.clone(),
        entity_name: set.entity.name.clone(),
        facade,
        total_transfer_size,
        total_blocking_time,
        total_main_thread_time,
        sub_items: condense_sub_items(items, min_sub_item_size),
    })
}

/// One opportunity per non-empty set, in set-creation order
pub fn rank_opportunities(sets: &AttributionSets<'_>, min_sub_item_size: u64) -> Vec<Opportunity> {
    sets.iter()
        .filter_map(|set| build_opportunity(set, min_sub_item_size))
        .collect()
}

/// Sum savings over all opportunities
pub fn summarize_opportunities(opportunities: &[Opportunity]) -> Summary {
    opportunities.iter().fold(Summary::default(), |acc, o| Summary {
        wasted_bytes: acc.wasted_bytes.saturating_add(o.total_transfer_size),
        wasted_ms: acc.wasted_ms + o.total_blocking_time,
    })
}

/// Largest first; equal sizes keep discovery order
fn sort_by_transfer_size(items: &mut [SubItem]) {
    items.sort_by(|a, b| b.transfer_size.cmp(&a.transfer_size));
}

/// Fold items under `min_size` bytes into one trailing "Other resources" row
///
/// Items at or above the threshold keep their relative order. The synthetic
/// row is appended last whenever anything was folded, whatever its size.
pub fn condense_sub_items(items: Vec<SubItem>, min_size: u64) -> Vec<SubItem> {
    let (mut kept, small): (Vec<SubItem>, Vec<SubItem>) = items
        .into_iter()
        .partition(|item| item.transfer_size >= min_size);

    if small.is_empty() {
        return kept;
    }

    let other = small.iter().fold(
        SubItem {
            source: SubItemSource::OtherResources,
            transfer_size: 0,
            blocking_time: 0.0,
            main_thread_time: 0.0,
            first_start_time: None,
            first_end_time: None,
        },
        |mut acc, item| {
            acc.transfer_size = acc.transfer_size.saturating_add(item.transfer_size);
            acc.blocking_time += item.blocking_time;
            acc.main_thread_time += item.main_thread_time;
            acc
        },
    );
    kept.push(other);
    kept
}
