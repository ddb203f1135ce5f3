//! # lingo-catalog
//!
//! Qt Linguist (`.ts`) translation catalogs for the acquisition front end.
//! A [`Catalog`] is loaded once per locale, then answers lookups of the form
//! "context + source phrase (+ comment) → localized phrase", falling back to
//! the source phrase when nothing matches. [`CatalogHandle`] swaps catalogs
//! atomically on a locale switch.

mod audit;
mod bundled;
mod catalog;
mod diagnostics;
mod handle;
mod loader;
mod model;
mod parse;
mod write;

#[cfg(test)]
mod tests;

// Re-export public API: all consumers use `lingo_catalog::*` paths.
pub use audit::{ContextCoverage, CoverageReport};
pub use bundled::{bundled, bundled_locales};
pub use catalog::{Catalog, SourceTexts, TS_VERSION};
pub use diagnostics::{MissReason, StatsSnapshot};
pub use handle::CatalogHandle;
pub use loader::{CatalogLoader, LoadReport};
pub use model::{Context, Location, MessageEntry, TranslationType};
pub use parse::{parse_ts, parse_ts_bytes, Parsed};
