//! Invocation adapters: how a command reaches the bot and how its reply leaves.
//!
//! The transport builds one adapter per incoming command. Adapters hand their
//! reply to the transport over a oneshot channel, and `reply` consumes the
//! adapter, so an invocation can answer at most once. [`dispatch`] always
//! answers, which makes it exactly once.

use crate::command::{self, Command, Request};
use crate::config::BotConfig;
use crate::error::DispatchError;
use crate::format::UNKNOWN_COMMAND_TEXT;
use regex::Regex;
use tokio::sync::oneshot;

/// Appended to private replies that have to be posted in a shared channel.
pub const PRIVATE_NOTICE: &str = "\n*(This message is only visible to you)*";

/// A message ready for the transport to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub channel_id: u64,
    pub text: String,
    /// Deliver so only the invoker can see it
    pub ephemeral: bool,
}

/// One incoming command, from whichever surface it arrived on.
pub trait Invocation {
    fn invoker(&self) -> &str;
    fn channel_id(&self) -> u64;
    /// Direct conversations are exempt from the channel restriction.
    fn is_direct(&self) -> bool {
        false
    }
    fn reply(self, text: String, private: bool) -> Result<(), DispatchError>;
}

/// A native slash command. Private replies are delivered ephemerally.
#[derive(Debug)]
pub struct SlashCommand {
    invoker: String,
    channel_id: u64,
    sender: oneshot::Sender<Outgoing>,
}

impl SlashCommand {
    pub fn new(
        invoker: impl Into<String>,
        channel_id: u64,
    ) -> (Self, oneshot::Receiver<Outgoing>) {
        let (sender, receiver) = oneshot::channel();
        let invocation = Self {
            invoker: invoker.into(),
            channel_id,
            sender,
        };
        (invocation, receiver)
    }
}

impl Invocation for SlashCommand {
    fn invoker(&self) -> &str {
        &self.invoker
    }

    fn channel_id(&self) -> u64 {
        self.channel_id
    }

    fn reply(self, text: String, private: bool) -> Result<(), DispatchError> {
        self.sender
            .send(Outgoing {
                channel_id: self.channel_id,
                text,
                ephemeral: private,
            })
            .map_err(|_| DispatchError::ReplyClosed)
    }
}

/// A command sent as a direct message or a message mentioning the bot.
///
/// Plain messages cannot be ephemeral: private replies in a shared channel
/// carry [`PRIVATE_NOTICE`] instead, and in a direct message they are sent as-is.
#[derive(Debug)]
pub struct Mention {
    invoker: String,
    channel_id: u64,
    is_direct: bool,
    sender: oneshot::Sender<Outgoing>,
}

impl Mention {
    pub fn new(
        invoker: impl Into<String>,
        channel_id: u64,
        is_direct: bool,
    ) -> (Self, oneshot::Receiver<Outgoing>) {
        let (sender, receiver) = oneshot::channel();
        let invocation = Self {
            invoker: invoker.into(),
            channel_id,
            is_direct,
            sender,
        };
        (invocation, receiver)
    }
}

impl Invocation for Mention {
    fn invoker(&self) -> &str {
        &self.invoker
    }

    fn channel_id(&self) -> u64 {
        self.channel_id
    }

    fn is_direct(&self) -> bool {
        self.is_direct
    }

    fn reply(self, mut text: String, private: bool) -> Result<(), DispatchError> {
        if private && !self.is_direct {
            text.push_str(PRIVATE_NOTICE);
        }
        self.sender
            .send(Outgoing {
                channel_id: self.channel_id,
                text,
                ephemeral: false,
            })
            .map_err(|_| DispatchError::ReplyClosed)
    }
}

/// Run `command` for `invocation` and send its one reply.
///
/// A table load failure is returned without replying; the transport decides
/// how to surface it.
pub async fn dispatch<I: Invocation>(
    config: &BotConfig,
    invocation: I,
    command: Command,
    argument: &str,
) -> Result<(), DispatchError> {
    let request = Request {
        invoker: invocation.invoker(),
        channel_id: invocation.channel_id(),
        is_direct: invocation.is_direct(),
        argument,
    };
    let reply = command::handle(config, command, request).await?;
    invocation.reply(reply.text, reply.private)
}

/// A chat message as the transport saw it.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub author: String,
    /// The bot wrote this message itself
    pub author_is_self: bool,
    pub channel_id: u64,
    pub is_direct: bool,
    pub content: String,
}

/// What to do with an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageAction {
    /// Not addressed to the bot; no reply.
    Ignore,
    /// Addressed to the bot but not a known command.
    Unknown { command: String },
    Run { command: Command, argument: String },
}

/// Recognises bot mentions and splits a message into command and argument.
#[derive(Debug, Clone)]
pub struct MentionParser {
    mention: Regex,
}

impl MentionParser {
    /// Match mentions of `bot_user_id`, or of any user when it is unknown.
    pub fn new(bot_user_id: Option<u64>) -> Result<Self, regex::Error> {
        let id = bot_user_id.map_or_else(|| r"\d+".to_string(), |id| id.to_string());
        let mention = Regex::new(&format!("<@!?{}>", id))?;
        Ok(Self { mention })
    }

    pub fn mentions_bot(&self, content: &str) -> bool {
        self.mention.is_match(content)
    }

    pub fn parse(&self, message: &IncomingMessage) -> MessageAction {
        if message.author_is_self || (!message.is_direct && !self.mentions_bot(&message.content)) {
            return MessageAction::Ignore;
        }

        let content = self.mention.replace_all(&message.content, "");
        let content = content.trim();
        let (name, argument) = content.split_once(' ').unwrap_or((content, ""));

        match Command::from_name(name) {
            Some(command) => MessageAction::Run {
                command,
                argument: argument.to_string(),
            },
            None => MessageAction::Unknown {
                command: name.to_lowercase(),
            },
        }
    }
}

/// Handle one incoming message through the mention adapter.
///
/// Returns `None` when the message is ignored, otherwise the delivered reply.
pub async fn dispatch_message(
    config: &BotConfig,
    parser: &MentionParser,
    message: &IncomingMessage,
) -> Result<Option<Outgoing>, DispatchError> {
    let action = parser.parse(message);
    if action == MessageAction::Ignore {
        return Ok(None);
    }

    let (invocation, receiver) =
        Mention::new(&message.author, message.channel_id, message.is_direct);
    let via = if message.is_direct { "DM" } else { "mention" };

    match action {
        MessageAction::Ignore => return Ok(None),
        MessageAction::Unknown { command } => {
            tracing::info!("User {} sent unknown command via {}: {}", message.author, via, command);
            invocation.reply(UNKNOWN_COMMAND_TEXT.to_string(), false)?;
        }
        MessageAction::Run { command, argument } => {
            tracing::info!(
                "User {} executed via {}: {} {}",
                message.author,
                via,
                command.name(),
                argument
            );
            dispatch(config, invocation, command, &argument).await?;
        }
    }

    receiver.await.map(Some).map_err(|_| DispatchError::ReplyClosed)
}
