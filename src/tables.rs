//! Source tables: the nutrient-keyed and effect-keyed lookup documents.
//!
//! Both documents are JSON objects. They are read fresh for every invocation
//! and the document's key order is kept as the encounter order for sorting.

use crate::config::BotConfig;
use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One nutrient record: what it is, how long it lasts, what it does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientEntry {
    pub nutrient: String,
    pub duration: String,
    /// `"<value><suffix> <description>"`, e.g. `"+15% Health"`
    pub effect: String,
}

/// Ordered sub-records listed under one effect name.
pub type EffectEntry = Vec<NutrientEntry>;

/// Both lookup tables, in document order.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub nutrients: Vec<(String, NutrientEntry)>,
    pub effects: Vec<(String, EffectEntry)>,
}

impl SourceTables {
    /// Load both tables concurrently. Either failing fails the whole load.
    pub async fn load(config: &BotConfig) -> Result<Self, LoadError> {
        let (nutrients, effects) = tokio::try_join!(
            load_table::<NutrientEntry>("nutrient", &config.nutrient_file),
            load_table::<EffectEntry>("effect", &config.effect_file),
        )?;
        tracing::debug!(
            nutrients = nutrients.len(),
            effects = effects.len(),
            "Loaded source tables"
        );
        Ok(Self { nutrients, effects })
    }

    /// Build tables from JSON text. Mostly useful for tests and tooling.
    pub fn from_json(nutrients: &str, effects: &str) -> Result<Self, LoadError> {
        Ok(Self {
            nutrients: parse_table("nutrient", Path::new("<inline>"), nutrients)?,
            effects: parse_table("effect", Path::new("<inline>"), effects)?,
        })
    }
}

async fn load_table<T>(table: &'static str, path: &Path) -> Result<Vec<(String, T)>, LoadError>
where
    T: for<'de> Deserialize<'de>,
{
    let text = tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                table,
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Read {
                table,
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_table(table, path, &text)
}

fn parse_table<T>(
    table: &'static str,
    path: &Path,
    text: &str,
) -> Result<Vec<(String, T)>, LoadError>
where
    T: for<'de> Deserialize<'de>,
{
    let parse_error = |error: String| LoadError::Parse {
        table,
        path: path.to_path_buf(),
        error,
    };

    // serde_json's `preserve_order` keeps the map in document order
    let document: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(text).map_err(|e| parse_error(e.to_string()))?;

    document
        .into_iter()
        .map(|(key, value)| {
            serde_json::from_value(value)
                .map(|entry| (key.clone(), entry))
                .map_err(|e| parse_error(format!("entry '{}': {}", key, e)))
        })
        .collect()
}
