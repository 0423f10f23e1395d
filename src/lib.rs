pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod invocation;
pub mod search;
pub mod server;
pub mod tables;
pub mod tracing;

pub use command::{Command, Reply, Request};
pub use config::BotConfig;
pub use error::{DispatchError, LoadError, Result};
pub use format::{Outcome, RenderedBlock};
pub use invocation::{Invocation, Mention, SlashCommand};
pub use search::{Match, Resolution, Resolver, SortOrder, Source};
pub use tables::{NutrientEntry, SourceTables};
