//! Card system: definitions, categories, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Unique string identifier of a catalog entry
//! - `Category`: Permission class; split variants aim at one variable
//! - `Card`: Static card data (fragment, complexity, draw weight)
//! - `CardCatalog`: Lookup, JSON loading, and weighted candidate sampling

pub mod catalog;
pub mod definition;

pub use catalog::{CardCatalog, CatalogError};
pub use definition::{Card, CardId, Category};
