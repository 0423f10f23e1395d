//! Lookup infrastructure for the buff tables.
//!
//! This module provides value parsing, fuzzy key similarity, and query
//! resolution (matching, deduplication, sorting) over the loaded tables.

// Module declarations
pub(crate) mod resolve;
pub(crate) mod similarity;
pub(crate) mod value;

// Public re-exports (used via lib.rs)
pub use resolve::{
    Match, Resolution, Resolver, SkippedRecord, SortDirection, SortKey, SortOrder, Source,
    normalize_query,
};
pub use similarity::{IndelRatio, Similarity, key_matches};
pub use value::{effect_value, parse_effect_value};
