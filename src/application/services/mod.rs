//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (Classifier, RowSource)
//! but are themselves concrete structs, not traits.

mod catalog;
mod classification;

pub use catalog::{Catalog, CatalogService, Lookup, RankedChapter};
pub use classification::{ClassificationService, Outcome};
