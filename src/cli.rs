use crate::command::Command;
use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "buffbot")]
#[command(about = "No Man's Sky nutrient and effect lookups", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to <config dir>/buffbot/config.toml when present)
    #[arg(long, global = true, env = "BUFFBOT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Nutrient-keyed table document
    #[arg(long, global = true, env = "NUTRIENT_FILE", value_name = "PATH")]
    pub nutrient_file: Option<PathBuf>,

    /// Effect-keyed table document
    #[arg(long, global = true, env = "EFFECT_FILE", value_name = "PATH")]
    pub effect_file: Option<PathBuf>,

    /// Only channel in which lookups are answered
    #[arg(long, global = true, env = "ALLOWED_CHANNEL_ID")]
    pub allowed_channel: Option<u64>,

    /// Also write logs to this file, without colour
    #[arg(long, global = true, env = "LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The bot's user id, for recognising mentions
    #[arg(long, global = true, env = "BOT_USER_ID")]
    pub bot_user_id: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the commands as MCP tools over stdio (default)
    Serve,
    /// Run one lookup and print the reply
    Query {
        text: String,
        #[arg(short, long, value_enum, default_value_t = QueryOrder::Value)]
        order: QueryOrder,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryOrder {
    /// Highest effect value first, like /buff
    Value,
    /// Lowest effect value first, like /buffneg
    Neg,
    /// Alphabetical by name, like /buffa
    Alpha,
}

impl QueryOrder {
    pub const fn command(self) -> Command {
        match self {
            Self::Value => Command::Buff,
            Self::Neg => Command::BuffNeg,
            Self::Alpha => Command::BuffAlpha,
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            nutrient_file: self.nutrient_file.clone(),
            effect_file: self.effect_file.clone(),
            allowed_channel: self.allowed_channel,
            log_file: self.log_file.clone(),
            bot_user_id: self.bot_user_id,
        }
    }
}
