use anyhow::Context;
use buffbot::cli::{Cli, Commands};
use buffbot::command::{self, Request};
use buffbot::config::BotConfig;
use buffbot::server::BuffServer;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> buffbot::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = BotConfig::load(cli.config.as_deref(), cli.overrides())
        .context("Failed to load configuration")?;
    buffbot::tracing::init(config.log_file.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => serve(config).await,
        Some(Commands::Query { text, order }) => query(&config, order.command(), &text).await,
    }
}

async fn serve(config: BotConfig) -> buffbot::Result<()> {
    tracing::info!(
        nutrients = %config.nutrient_file.display(),
        effects = %config.effect_file.display(),
        channel = config.allowed_channel,
        "Starting buffbot MCP server"
    );

    let server = BuffServer::new(config).context("Invalid bot user id pattern")?;
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}

/// Run one lookup locally. The channel restriction does not apply here.
async fn query(config: &BotConfig, command: command::Command, text: &str) -> buffbot::Result<()> {
    let request = Request {
        invoker: "cli",
        channel_id: config.allowed_channel,
        is_direct: true,
        argument: text,
    };
    let reply = command::handle(config, command, request)
        .await
        .context("Lookup failed")?;
    println!("{}", reply.text);
    Ok(())
}
