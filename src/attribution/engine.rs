// Two-pass timing-based attribution of resources to facadable products
//
// Pass 1 seeds one set per (entity, product) that has a facade, using the
// product's own URLs, and records the earliest headers-received time as the
// set's cutoff. Pass 2 walks the same records again and attaches every other
// resource of the same entity that started at or after a set's cutoff.
// Anything requested before the product's first response headers arrived
// can't have been triggered by that product's code.

use crate::classifier::{Entity, Product, ResourceClassifier};
use crate::ordered_map::OrderedMap;
use crate::summary::{UrlCostMap, UrlCostRecord};

/// Resources attributed to one facadable product
#[derive(Debug, Clone)]
pub struct AttributionSet<'a> {
    pub entity: &'a Entity,
    pub product: &'a Product,

    /// Earliest headers-received time among the product's own records.
    ///
    /// `f64::INFINITY` until one of them reports that time.
    pub cutoff_time: f64,

    /// url → record, unique by url, in attribution order
    members: OrderedMap<&'a str, &'a UrlCostRecord>,
}

impl<'a> AttributionSet<'a> {
    fn new(entity: &'a Entity, product: &'a Product) -> Self {
        Self {
            entity,
            product,
            cutoff_time: f64::INFINITY,
            members: OrderedMap::new(),
        }
    }

    /// Add a record; returns false if its URL is already a member
    fn add_member(&mut self, record: &'a UrlCostRecord) -> bool {
        if self.members.contains_key(record.url.as_str()) {
            return false;
        }
        self.members.insert(record.url.as_str(), record);
        true
    }

    /// Lower the cutoff to `headers_received` if it is earlier.
    ///
    /// Never raises the cutoff; missing or NaN times are ignored.
    fn lower_cutoff(&mut self, headers_received: Option<f64>) {
        if let Some(t) = headers_received.filter(|t| !t.is_nan()) {
            self.cutoff_time = self.cutoff_time.min(t);
        }
    }

    /// Whether a resource started late enough to have been caused by this product
    pub fn admits(&self, record: &UrlCostRecord) -> bool {
        record
            .first_start_time
            .is_some_and(|start| start >= self.cutoff_time)
    }

    pub fn members(&self) -> impl Iterator<Item = &'a UrlCostRecord> + '_ {
        self.members.values().copied()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.members.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// All attribution sets of a page, in creation order
#[derive(Debug, Clone, Default)]
pub struct AttributionSets<'a> {
    sets: Vec<AttributionSet<'a>>,

    /// entity name → product name → index into `sets`
    by_entity: OrderedMap<&'a str, OrderedMap<&'a str, usize>>,
}

impl<'a> AttributionSets<'a> {
    fn entry(&mut self, entity: &'a Entity, product: &'a Product) -> &mut AttributionSet<'a> {
        let next = self.sets.len();
        let idx = *self
            .by_entity
            .get_or_insert_with(entity.name.as_str(), OrderedMap::new)
            .get_or_insert_with(product.name.as_str(), || next);

        if idx == next {
            tracing::debug!(entity = %entity.name, product = %product.name, "new attribution set");
            self.sets.push(AttributionSet::new(entity, product));
        }
        &mut self.sets[idx]
    }

    /// Add `record` to every set of `entity` whose cutoff it satisfies
    fn attribute_to_entity(&mut self, entity: &Entity, record: &'a UrlCostRecord) {
        let Some(products) = self.by_entity.get(entity.name.as_str()) else {
            return;
        };

        for &idx in products.values() {
            let set = &mut self.sets[idx];
            if set.admits(record) {
                if set.add_member(record) {
                    tracing::trace!(
                        url = %record.url,
                        product = %set.product.name,
                        cutoff = set.cutoff_time,
                        "attributed"
                    );
                }
            } else {
                tracing::trace!(
                    url = %record.url,
                    product = %set.product.name,
                    start = ?record.first_start_time,
                    cutoff = set.cutoff_time,
                    "started before cutoff"
                );
            }
        }
    }

    pub fn get(&self, entity: &str, product: &str) -> Option<&AttributionSet<'a>> {
        let idx = *self.by_entity.get(entity)?.get(product)?;
        self.sets.get(idx)
    }

    /// Sets belonging to `entity`, in creation order
    pub fn for_entity<'s>(&'s self, entity: &str) -> impl Iterator<Item = &'s AttributionSet<'a>> {
        self.by_entity
            .get(entity)
            .into_iter()
            .flat_map(|products| products.values())
            .map(move |&idx| &self.sets[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributionSet<'a>> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl<'s, 'a> IntoIterator for &'s AttributionSets<'a> {
    type Item = &'s AttributionSet<'a>;
    type IntoIter = std::slice::Iter<'s, AttributionSet<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}

/// Attribute page resources to facadable products
///
/// # Arguments
/// * `records` - One cost record per URL, in discovery order
/// * `classifier` - Entity/product lookup
/// * `main_entity` - Entity of the main document; its resources are skipped
///
/// # Returns
/// One set per facadable product found on the page, in the order the
/// products were first seen.
pub fn attribute_resources<'a, C>(
    records: &'a UrlCostMap,
    classifier: &'a C,
    main_entity: Option<&Entity>,
) -> AttributionSets<'a>
where
    C: ResourceClassifier + ?Sized,
{
    let sets = seed_product_sets(records, classifier, main_entity);
    attribute_incidental(sets, records, classifier, main_entity)
}

/// Pass 1: one set per facadable product, seeded with its own URLs
pub fn seed_product_sets<'a, C>(
    records: &'a UrlCostMap,
    classifier: &'a C,
    main_entity: Option<&Entity>,
) -> AttributionSets<'a>
where
    C: ResourceClassifier + ?Sized,
{
    let mut sets = AttributionSets::default();

    for record in records.values() {
        let Some(entity) = third_party_entity(record, classifier, main_entity) else {
            continue;
        };
        let Some(product) = classifier.product_of(&record.url) else {
            continue;
        };
        if !product.has_facade() {
            continue;
        }

        let set = sets.entry(entity, product);
        set.add_member(record);
        set.lower_cutoff(record.first_headers_received_time);
    }

    sets
}

/// Pass 2: attach same-entity resources that started after a set's cutoff
///
/// A resource qualifying for several sibling products joins all of them.
pub fn attribute_incidental<'a, C>(
    mut sets: AttributionSets<'a>,
    records: &'a UrlCostMap,
    classifier: &'a C,
    main_entity: Option<&Entity>,
) -> AttributionSets<'a>
where
    C: ResourceClassifier + ?Sized,
{
    if sets.is_empty() {
        return sets;
    }

    for record in records.values() {
        let Some(entity) = third_party_entity(record, classifier, main_entity) else {
            continue;
        };
        if classifier
            .product_of(&record.url)
            .is_some_and(Product::has_facade)
        {
            continue;
        }

        sets.attribute_to_entity(entity, record);
    }

    sets
}

/// The record's entity, or `None` if it is unclassifiable or first-party
fn third_party_entity<'a, C>(
    record: &UrlCostRecord,
    classifier: &'a C,
    main_entity: Option<&Entity>,
) -> Option<&'a Entity>
where
    C: ResourceClassifier + ?Sized,
{
    let Some(entity) = classifier.entity_of(&record.url) else {
        tracing::trace!(url = %record.url, "unclassified");
        return None;
    };
    if classifier.is_first_party(&record.url, main_entity) {
        tracing::trace!(url = %record.url, entity = %entity.name, "first-party");
        return None;
    }
    Some(entity)
}
