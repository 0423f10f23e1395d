//! Bot configuration: the context object handed to every invocation.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables and command-line flags (see [`ConfigOverrides`]).

use crate::error::ConfigError;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Channel the lookup commands are restricted to unless configured otherwise.
pub const DEFAULT_ALLOWED_CHANNEL: u64 = 1_376_435_614_702_112_899;

/// Minimum similarity (0-100) for a fuzzy key match.
pub const DEFAULT_MATCH_THRESHOLD: u8 = 80;

/// Character budget for one rendered response.
pub const DEFAULT_MAX_RESPONSE_LENGTH: usize = 1900;

/// Responses with more rendered entries than this are sent privately.
pub const DEFAULT_PRIVATE_ABOVE: usize = 6;

/// Resolved configuration for the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Path to the nutrient-keyed table document
    pub nutrient_file: PathBuf,
    /// Path to the effect-keyed table document
    pub effect_file: PathBuf,
    /// The only channel in which lookup commands are answered
    pub allowed_channel: u64,
    pub match_threshold: u8,
    pub max_response_length: usize,
    pub private_above: usize,
    /// Optional plain-text log sink
    pub log_file: Option<PathBuf>,
    /// The bot's own user id, used to recognise mentions
    pub bot_user_id: Option<u64>,
}

impl BotConfig {
    /// Build a config for the given tables with every other value defaulted.
    pub fn new(nutrient_file: impl Into<PathBuf>, effect_file: impl Into<PathBuf>) -> Self {
        Self {
            nutrient_file: nutrient_file.into(),
            effect_file: effect_file.into(),
            allowed_channel: DEFAULT_ALLOWED_CHANNEL,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            max_response_length: DEFAULT_MAX_RESPONSE_LENGTH,
            private_above: DEFAULT_PRIVATE_ABOVE,
            log_file: None,
            bot_user_id: None,
        }
    }

    pub fn with_allowed_channel(mut self, channel: u64) -> Self {
        self.allowed_channel = channel;
        self
    }

    pub fn with_max_response_length(mut self, budget: usize) -> Self {
        self.max_response_length = budget;
        self
    }

    /// Layer a config file (if any) and overrides on top of the defaults.
    ///
    /// An explicit `config_path` must exist. Without one, the per-user
    /// `buffbot/config.toml` in the platform config directory is used when present.
    pub fn load(
        config_path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => Some(FileConfig::read(path)?),
            None => match default_config_path() {
                Some(path) if path.is_file() => Some(FileConfig::read(&path)?),
                _ => None,
            },
        };
        Self::from_layers(file.unwrap_or_default(), overrides)
    }

    fn from_layers(file: FileConfig, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let nutrient_file = overrides
            .nutrient_file
            .or(file.nutrient_file)
            .ok_or(ConfigError::Missing("nutrient table path"))?;
        let effect_file = overrides
            .effect_file
            .or(file.effect_file)
            .ok_or(ConfigError::Missing("effect table path"))?;

        Ok(Self {
            nutrient_file: expand_path(&nutrient_file),
            effect_file: expand_path(&effect_file),
            allowed_channel: overrides
                .allowed_channel
                .or(file.allowed_channel)
                .unwrap_or(DEFAULT_ALLOWED_CHANNEL),
            match_threshold: file.match_threshold.unwrap_or(DEFAULT_MATCH_THRESHOLD),
            max_response_length: file
                .max_response_length
                .unwrap_or(DEFAULT_MAX_RESPONSE_LENGTH),
            private_above: file.private_above.unwrap_or(DEFAULT_PRIVATE_ABOVE),
            log_file: overrides
                .log_file
                .or(file.log_file)
                .map(|path| expand_path(&path)),
            bot_user_id: overrides.bot_user_id.or(file.bot_user_id),
        })
    }
}

/// Values supplied by the environment or command line. They win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub nutrient_file: Option<PathBuf>,
    pub effect_file: Option<PathBuf>,
    pub allowed_channel: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub bot_user_id: Option<u64>,
}

/// On-disk shape of the TOML config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    nutrient_file: Option<PathBuf>,
    effect_file: Option<PathBuf>,
    allowed_channel: Option<u64>,
    match_threshold: Option<u8>,
    max_response_length: Option<usize>,
    private_above: Option<usize>,
    log_file: Option<PathBuf>,
    bot_user_id: Option<u64>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("buffbot").join("config.toml"))
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(expand_tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
