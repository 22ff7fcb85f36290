// URL → entity/product/facade classification
//
// The database content is external (TOML); this module only provides the
// lookup service over it. The audit consumes the `ResourceClassifier` trait so
// any source of classification data can be injected.

mod definition;
mod error;
mod registry;

pub use definition::{Entity, Facade, Product};
pub use error::ClassifierError;
pub use registry::{network_host, EntityRegistry, ResourceClassifier};
