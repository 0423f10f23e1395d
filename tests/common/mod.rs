//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `tables_workspace`: a temp directory holding the standard nutrient and
//!   effect documents, with a `BotConfig` pointing at them
//! - `large_workspace`: enough matches for "iron" to overflow the response budget
//!
//! Tests get their own directory, so documents can be rewritten freely.

use buffbot::BotConfig;
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Channel the fixtures allow lookups in.
#[allow(dead_code)]
pub const CHANNEL: u64 = 1_376_435_614_702_112_899;

pub const NUTRIENTS: &str = r#"{
    "Iron Root": {"nutrient": "Iron", "duration": "10 minutes", "effect": "+15% Health"},
    "Iron Bark": {"nutrient": "Bark", "duration": "5 minutes", "effect": "+1,200 Shield"},
    "Ironwood": {"nutrient": "Wood", "duration": "5 minutes", "effect": "+15 Stamina"},
    "Copper Moss": {"nutrient": "Copper", "duration": "1 minute", "effect": "-3 Hazard Protection"},
    "Broken Ore": {"nutrient": "Slag", "duration": "1 minute", "effect": "??? Unknown"}
}"#;

pub const EFFECTS: &str = r#"{
    "Toxic": [
        {"nutrient": "Venom", "duration": "2 minutes", "effect": "N/A"},
        {"nutrient": "Spore", "duration": "2 minutes", "effect": "-20 Health"}
    ],
    "Iron Skin": [
        {"nutrient": "Iron", "duration": "3 minutes", "effect": "+50 Armor"},
        {"nutrient": "Chromium", "duration": "3 minutes", "effect": "+5% Armor"}
    ],
    "Radiation Shield": [
        {"nutrient": "Lead", "duration": "4 minutes", "effect": "+30% Radiation Protection"}
    ]
}"#;

/// A temporary directory holding table documents.
///
/// The directory is removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TablesWorkspace {
    _temp: TempDir,
    root: PathBuf,
    pub config: BotConfig,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TablesWorkspace {
    /// Creates a workspace with the given nutrient and effect documents.
    pub fn new(nutrients: &str, effects: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        let config = BotConfig::new(root.join("nutrients.json"), root.join("effects.json"))
            .with_allowed_channel(CHANNEL);
        let workspace = Self {
            _temp: temp,
            root,
            config,
        };
        workspace.create_file("nutrients.json", nutrients);
        workspace.create_file("effects.json", effects);
        workspace
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates (or replaces) a file within this workspace.
    ///
    /// # Panics
    /// Panics if the write fails.
    pub fn create_file(&self, path: &str, content: &str) {
        std::fs::write(self.root.join(path), content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }
}

/// Standard nutrient and effect tables.
#[fixture]
pub fn tables_workspace() -> TablesWorkspace {
    TablesWorkspace::new(NUTRIENTS, EFFECTS)
}

/// Sixty "Iron" nutrients with distinct values, more than one block can hold.
#[fixture]
pub fn large_workspace() -> TablesWorkspace {
    let entries: Vec<String> = (0..60)
        .map(|i| {
            format!(
                r#""Iron Variety {i:02}": {{"nutrient": "Iron {i}", "duration": "{i} minutes", "effect": "+{} Health"}}"#,
                (i * 37) % 100
            )
        })
        .collect();
    TablesWorkspace::new(&format!("{{{}}}", entries.join(",\n")), "{}")
}
