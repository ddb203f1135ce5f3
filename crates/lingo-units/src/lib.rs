//! # lingo-units
//!
//! SI-prefix formatting and parsing for instrument values (sample rates,
//! durations, voltages). The prefix letters are themselves translatable: they
//! are resolved through the catalog's `si prefixes` and
//! `si prefix alternative micro` contexts, so a Russian catalog renders
//! `1.5 кS/s` and `500 мкV`.

mod error;
mod format;
mod prefixes;


pub use error::UnitError;
pub use format::format_g;
pub use prefixes::{SiPrefixes, MICRO_CONTEXT, PREFIXES_CONTEXT, PREFIXES_SOURCE};
