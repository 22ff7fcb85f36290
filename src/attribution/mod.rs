// Timing-based attribution of third-party resources to facadable products
//
// There is no initiator graph here. The only evidence that a product caused a
// resource to load is that the resource belongs to the same entity and was
// requested after the product's first response headers arrived.
//
// Known behavior kept as-is: a resource that satisfies the cutoff of several
// sibling products (same entity) is counted in every one of them.

mod engine;

pub use engine::{
    attribute_incidental, attribute_resources, seed_product_sets, AttributionSet,
    AttributionSets,
};
