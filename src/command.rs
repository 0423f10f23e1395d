//! Command handling: policies, the channel restriction, and reply building.

use crate::config::BotConfig;
use crate::error::LoadError;
use crate::format::{self, Outcome};
use crate::search::{IndelRatio, Resolver, SortDirection, SortOrder};
use crate::tables::SourceTables;

/// The bot's commands. Every command except `Help` runs a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Sorted by effect value, highest first
    Buff,
    /// Sorted by effect value, lowest first
    BuffNeg,
    /// Sorted alphabetically by name
    BuffAlpha,
    Help,
}

impl Command {
    pub const ALL: [Self; 4] = [Self::Buff, Self::BuffNeg, Self::BuffAlpha, Self::Help];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Buff => "buff",
            Self::BuffNeg => "buffneg",
            Self::BuffAlpha => "buffa",
            Self::Help => "buffhelp",
        }
    }

    /// Look up a command by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.name().eq_ignore_ascii_case(name))
    }

    /// Sort policy for lookup commands; `None` for help.
    pub const fn sort_order(self) -> Option<SortOrder> {
        match self {
            Self::Buff => Some(SortOrder::by_value(SortDirection::Descending)),
            Self::BuffNeg => Some(SortOrder::by_value(SortDirection::Ascending)),
            Self::BuffAlpha => Some(SortOrder::alphabetical()),
            Self::Help => None,
        }
    }

    /// The slash-command form of this command with its argument, e.g. `/buffneg iron`.
    pub fn command_text(self, argument: &str) -> String {
        if self == Self::Help {
            format!("/{}", self.name())
        } else {
            format!("/{} {}", self.name(), argument)
        }
    }
}

/// The single response for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Visible only to the invoker
    pub private: bool,
}

impl Reply {
    pub fn private(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            private: true,
        }
    }
}

/// Who asked, where, and for what.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub invoker: &'a str,
    pub channel_id: u64,
    /// Direct messages are exempt from the channel restriction
    pub is_direct: bool,
    pub argument: &'a str,
}

/// Run `command` for `request`, loading the tables if a lookup is needed.
///
/// Table load failures are returned as errors; every other path yields a reply.
pub async fn handle(
    config: &BotConfig,
    command: Command,
    request: Request<'_>,
) -> Result<Reply, LoadError> {
    let Some(order) = command.sort_order() else {
        tracing::info!(invoker = request.invoker, "Command executed: /buffhelp, Entries found: 0");
        return Ok(Reply::private(format::help_text(
            config.allowed_channel,
            config.max_response_length,
        )));
    };

    if !request.is_direct && request.channel_id != config.allowed_channel {
        tracing::info!(
            "User {} attempted /{} in wrong channel: {}",
            request.invoker,
            command.name(),
            request.channel_id
        );
        return Ok(Reply::private(format::wrong_channel_text(
            config.allowed_channel,
        )));
    }

    let tables = SourceTables::load(config).await?;
    Ok(lookup(config, &tables, command, order, request))
}

/// Resolve, render and classify one lookup against already-loaded tables.
pub fn lookup(
    config: &BotConfig,
    tables: &SourceTables,
    command: Command,
    order: SortOrder,
    request: Request<'_>,
) -> Reply {
    let resolver = Resolver::new(tables, IndelRatio, config.match_threshold);
    let resolution = resolver.resolve(request.argument, order);

    let command_text = command.command_text(request.argument);
    let outcome = format::render_block(
        &command_text,
        request.argument,
        &resolution.matches,
        config.max_response_length,
    );

    tracing::info!(
        "User {} executed: {}, Entries found: {}",
        request.invoker,
        command_text,
        resolution.matches.len()
    );

    match outcome {
        Outcome::Found(block) => Reply {
            private: block.shown > config.private_above,
            text: block.text,
        },
        Outcome::NoMatch { query } => Reply::private(format::no_match_text(&query)),
    }
}
