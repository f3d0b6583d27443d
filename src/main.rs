use anyhow::Context as AnyhowContext;
use serenity::{Client, model::prelude::*};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod constant;
mod emote;
mod error;
mod handler;
mod util;

use config::Configuration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Configuration::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    let commands: Vec<Box<dyn commands::CommandHandler>> =
        vec![Box::new(commands::emote::Handler::new(&config)?)];

    let mut client = Client::builder(
        config
            .authentication
            .discord_token
            .as_deref()
            .context("Expected authentication.discord_token to be filled in config")?,
        GatewayIntents::GUILDS,
    )
    .event_handler(handler::Handler::new(commands))
    .await
    .context("Error creating client")?;

    if let Err(why) = client.start().await {
        tracing::error!("Client error: {why:?}");
    }

    Ok(())
}
