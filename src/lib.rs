//! facade-finder - third-party facade opportunity audit
//!
//! Given per-URL network cost records from a single page load and an
//! entity/product classification database, this library finds third-party
//! embeds (chat widgets, video players, ...) that could be replaced by a
//! lightweight facade until the user interacts, and attributes the bytes and
//! main-thread time that would be saved.

pub mod attribution;
pub mod audit;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod json_output;
pub mod opportunity;
pub mod ordered_map;
pub mod summary;
pub mod text_output;
