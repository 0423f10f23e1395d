//! MCP server exposing the bot's commands as tools.
//!
//! Each tool call is one invocation. Lookup and help tools go through the
//! slash-command adapter; the `message` tool goes through the mention adapter.

use crate::command::Command;
use crate::config::BotConfig;
use crate::error::DispatchError;
use crate::invocation::{
    IncomingMessage, MentionParser, Outgoing, SlashCommand, dispatch, dispatch_message,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters for the lookup tools (buff, buffneg, buffa)
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupRequest {
    /// Display name of the user running the command
    pub invoker: String,
    /// Channel the command was used in
    pub channel_id: u64,
    /// The nutrient or effect to search for
    pub text: String,
}

/// Parameters for the buffhelp tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct HelpRequest {
    /// Display name of the user running the command
    pub invoker: String,
    /// Channel the command was used in
    #[serde(default)]
    pub channel_id: u64,
}

/// Parameters for the message tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MessageRequest {
    /// Display name of the message author
    pub invoker: String,
    /// Channel the message was posted in
    pub channel_id: u64,
    /// Raw message content, including any bot mention
    pub content: String,
    /// The message is a direct message to the bot
    #[serde(default)]
    pub is_direct: bool,
    /// The message was written by the bot itself
    #[serde(default)]
    pub author_is_bot: bool,
}

/// The reply handed back to the calling transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReply {
    pub channel_id: u64,
    pub text: String,
    /// Only the invoker should see this reply
    pub private: bool,
}

impl From<Outgoing> for ToolReply {
    fn from(outgoing: Outgoing) -> Self {
        Self {
            channel_id: outgoing.channel_id,
            text: outgoing.text,
            private: outgoing.ephemeral,
        }
    }
}

impl ToolReply {
    fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to encode reply: {}", e))
    }
}

/// MCP Server for buff lookups
#[derive(Clone)]
pub struct BuffServer {
    /// Immutable configuration shared by every invocation
    config: Arc<BotConfig>,

    mentions: Arc<MentionParser>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for BuffServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuffServer")
            .field("config", &self.config)
            .finish()
    }
}

#[tool_router]
impl BuffServer {
    pub fn new(config: BotConfig) -> Result<Self, regex::Error> {
        let mentions = MentionParser::new(config.bot_user_id)?;
        Ok(Self {
            config: Arc::new(config),
            mentions: Arc::new(mentions),
            tool_router: Self::tool_router(),
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Run a command through the slash-command adapter and collect its reply.
    pub async fn run_command(
        &self,
        command: Command,
        invoker: String,
        channel_id: u64,
        argument: &str,
    ) -> Result<ToolReply, DispatchError> {
        tracing::debug!("Executing /{} with text: {}", command.name(), argument);
        let (invocation, receiver) = SlashCommand::new(invoker, channel_id);
        dispatch(&self.config, invocation, command, argument).await?;
        let outgoing = receiver.await.map_err(|_| DispatchError::ReplyClosed)?;
        Ok(outgoing.into())
    }

    async fn lookup_tool(&self, command: Command, request: LookupRequest) -> Result<String, String> {
        self.run_command(command, request.invoker, request.channel_id, &request.text)
            .await
            .map_err(|e| {
                tracing::error!("/{} failed: {}", command.name(), e);
                e.to_string()
            })?
            .to_json()
    }

    #[tool(
        description = "Look up No Man's Sky nutrients and effects matching the text, sorted by effect value (highest first)."
    )]
    async fn buff(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> std::result::Result<String, String> {
        self.lookup_tool(Command::Buff, request).await
    }

    #[tool(
        description = "Look up No Man's Sky nutrients and effects matching the text, sorted by effect value (lowest first)."
    )]
    async fn buffneg(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> std::result::Result<String, String> {
        self.lookup_tool(Command::BuffNeg, request).await
    }

    #[tool(
        description = "Look up No Man's Sky nutrients and effects matching the text, sorted alphabetically by name."
    )]
    async fn buffa(
        &self,
        Parameters(request): Parameters<LookupRequest>,
    ) -> std::result::Result<String, String> {
        self.lookup_tool(Command::BuffAlpha, request).await
    }

    #[tool(description = "Show help for the buff lookup commands.")]
    async fn buffhelp(
        &self,
        Parameters(HelpRequest {
            invoker,
            channel_id,
        }): Parameters<HelpRequest>,
    ) -> std::result::Result<String, String> {
        self.run_command(Command::Help, invoker, channel_id, "")
            .await
            .map_err(|e| e.to_string())?
            .to_json()
    }

    #[tool(
        description = "Handle a chat message addressed to the bot (direct message or mention). Returns an empty result when the message is not for the bot."
    )]
    async fn message(
        &self,
        Parameters(request): Parameters<MessageRequest>,
    ) -> std::result::Result<String, String> {
        let message = IncomingMessage {
            author: request.invoker,
            author_is_self: request.author_is_bot,
            channel_id: request.channel_id,
            is_direct: request.is_direct,
            content: request.content,
        };
        let outgoing = dispatch_message(&self.config, &self.mentions, &message)
            .await
            .map_err(|e| {
                tracing::error!("Message from {} failed: {}", message.author, e);
                e.to_string()
            })?;
        match outgoing {
            Some(outgoing) => ToolReply::from(outgoing).to_json(),
            None => Ok(String::new()),
        }
    }
}

#[tool_handler]
impl ServerHandler for BuffServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "buffbot: No Man's Sky nutrient and effect lookups. \
                 Use buff, buffneg or buffa with the invoking user, channel and search text; \
                 buffhelp for usage; message for raw mentions and direct messages. \
                 Replies are JSON objects with channel_id, text and private.",
            )
    }
}
