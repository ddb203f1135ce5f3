//! # lingo-core
//!
//! Core types, traits, configuration, and error handling shared by the
//! lingo translation catalog crates.

pub mod config;
pub mod error;
pub mod locale;
pub mod traits;
