//! Lookup miss diagnostics. Counters only; lookups never fail.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Why a lookup fell back to the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// No context with that name.
    UnknownContext,
    /// Context exists, no entry with that (source, comment).
    UnknownMessage,
    /// Entry exists but has no usable translation (empty, obsolete, or
    /// unfinished while unfinished entries are excluded).
    Untranslated,
}

impl MissReason {
    fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownContext => "unknown_context",
            Self::UnknownMessage => "unknown_message",
            Self::Untranslated => "untranslated",
        }
    }
}

/// Lock-free hit/miss counters attached to a catalog.
#[derive(Debug, Default)]
pub struct LookupStats {
    hits: AtomicU64,
    unknown_context: AtomicU64,
    unknown_message: AtomicU64,
    untranslated: AtomicU64,
}

/// Point-in-time copy of [`LookupStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub unknown_context: u64,
    pub unknown_message: u64,
    pub untranslated: u64,
}

impl StatsSnapshot {
    pub fn misses(&self) -> u64 {
        self.unknown_context + self.unknown_message + self.untranslated
    }
}

impl LookupStats {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self, reason: MissReason, context: &str, source: &str) {
        let counter = match reason {
            MissReason::UnknownContext => &self.unknown_context,
            MissReason::UnknownMessage => &self.unknown_message,
            MissReason::Untranslated => &self.untranslated,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        debug!(
            reason = reason.as_str(),
            context, source, "translation miss, showing source text"
        );
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            unknown_context: self.unknown_context.load(Ordering::Relaxed),
            unknown_message: self.unknown_message.load(Ordering::Relaxed),
            untranslated: self.untranslated.load(Ordering::Relaxed),
        }
    }
}
