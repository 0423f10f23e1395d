//! Query resolution: dual-table matching, deduplication and sorting.

use crate::error::ValueParseError;
use crate::search::similarity::{Similarity, key_matches};
use crate::search::value::{effect_value, parse_effect_value};
use crate::tables::{NutrientEntry, SourceTables};
use ahash::AHashSet;
use std::cmp::Ordering;
use std::fmt;

/// Which table a match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Nutrient,
    Effect,
}

impl Source {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nutrient => "Nutrient",
            Self::Effect => "Effect",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One resolved record, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The table key the record was found under
    pub key: String,
    pub nutrient: String,
    pub duration: String,
    pub effect: String,
    /// Leading token of `effect`, e.g. `"+15%"`
    pub effect_value: String,
    pub parsed_value: i64,
    pub source: Source,
}

impl Match {
    fn from_entry(
        key: &str,
        entry: &NutrientEntry,
        source: Source,
    ) -> Result<Self, ValueParseError> {
        let effect_value = effect_value(&entry.effect);
        let parsed_value = parse_effect_value(effect_value)?;
        Ok(Self {
            key: key.to_string(),
            nutrient: entry.nutrient.clone(),
            duration: entry.duration.clone(),
            effect: entry.effect.clone(),
            effect_value: effect_value.to_string(),
            parsed_value,
            source,
        })
    }
}

/// A record left out of the results because its effect value did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub key: String,
    pub record: NutrientEntry,
    pub error: ValueParseError,
}

/// Field a resolution is sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Value,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// How matches are ordered. With `alpha_override` set, key and direction are
/// ignored and matches are sorted by lower-cased key, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
    pub alpha_override: bool,
}

impl SortOrder {
    pub const fn by_value(direction: SortDirection) -> Self {
        Self {
            key: SortKey::Value,
            direction,
            alpha_override: false,
        }
    }

    pub const fn alphabetical() -> Self {
        Self {
            key: SortKey::Name,
            direction: SortDirection::Ascending,
            alpha_override: true,
        }
    }

    fn compare(&self, a: &Match, b: &Match) -> Ordering {
        if self.alpha_override {
            return a.key.to_lowercase().cmp(&b.key.to_lowercase());
        }
        let ordering = match self.key {
            SortKey::Value => a.parsed_value.cmp(&b.parsed_value),
            SortKey::Name => a.key.cmp(&b.key),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::by_value(SortDirection::Descending)
    }
}

/// Outcome of matching a query against both tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Matches in sorted order
    pub matches: Vec<Match>,
    /// Records that matched but were dropped for an unparsable effect value
    pub skipped: Vec<SkippedRecord>,
}

/// Lower-case and trim a raw query.
pub fn normalize_query(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Resolves queries against a pair of loaded tables.
pub struct Resolver<'a, S> {
    tables: &'a SourceTables,
    similarity: S,
    threshold: u8,
}

impl<'a, S: Similarity> Resolver<'a, S> {
    pub const fn new(tables: &'a SourceTables, similarity: S, threshold: u8) -> Self {
        Self {
            tables,
            similarity,
            threshold,
        }
    }

    /// Match `query` against both tables and sort the result.
    ///
    /// Skipped records are logged here and also returned so callers can
    /// account for them.
    pub fn resolve(&self, query: &str, order: SortOrder) -> Resolution {
        let query = normalize_query(query);
        if query.is_empty() {
            return Resolution::default();
        }

        let mut seen: AHashSet<String> = AHashSet::new();
        let mut resolution = Resolution::default();

        for (key, entry) in &self.tables.nutrients {
            let key_lower = key.to_lowercase();
            if !self.is_match(&query, &key_lower) || seen.contains(&key_lower) {
                continue;
            }
            match Match::from_entry(key, entry, Source::Nutrient) {
                Ok(found) => {
                    resolution.matches.push(found);
                    seen.insert(key_lower);
                }
                Err(error) => resolution.skip(key, entry, error),
            }
        }

        for (key, records) in &self.tables.effects {
            let key_lower = key.to_lowercase();
            if !self.is_match(&query, &key_lower) || seen.contains(&key_lower) {
                continue;
            }
            for record in records {
                let nutrient_lower = record.nutrient.to_lowercase();
                if seen.contains(&nutrient_lower) {
                    continue;
                }
                match Match::from_entry(key, record, Source::Effect) {
                    Ok(found) => {
                        resolution.matches.push(found);
                        seen.insert(nutrient_lower);
                    }
                    Err(error) => resolution.skip(key, record, error),
                }
            }
        }

        // Stable sort keeps document order among equal elements
        resolution.matches.sort_by(|a, b| order.compare(a, b));
        resolution
    }

    fn is_match(&self, query: &str, key_lower: &str) -> bool {
        key_matches(query, key_lower, self.threshold, &self.similarity)
    }
}

impl Resolution {
    fn skip(&mut self, key: &str, record: &NutrientEntry, error: ValueParseError) {
        tracing::error!(
            error = %error,
            key = %key,
            record = ?record,
            "Skipping record with unparsable effect value"
        );
        self.skipped.push(SkippedRecord {
            key: key.to_string(),
            record: record.clone(),
            error,
        });
    }
}
