use std::collections::HashSet;

use serenity::{
    all::{Command, Context, EventHandler, Http, Interaction, Ready},
    async_trait,
};

use crate::{commands::CommandHandler, util};

pub struct Handler {
    commands: Vec<Box<dyn CommandHandler>>,
}
impl Handler {
    pub fn new(commands: Vec<Box<dyn CommandHandler>>) -> Self {
        Self { commands }
    }
}
#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("{} is connected; registering commands...", ready.user.name);

        if let Err(err) = register_commands(&ctx.http, &self.commands).await {
            tracing::error!("Error while registering commands: `{err:#}`");
            std::process::exit(1);
        }

        tracing::info!("{} is good to go!", ready.user.name);
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let http = &ctx.http;
        let Interaction::Command(cmd) = interaction else {
            return;
        };

        let name = cmd.data.name.as_str();
        let Some(handler) = self.commands.iter().find(|h| h.name() == name) else {
            tracing::warn!("received unknown command `{name}`");
            return;
        };

        util::run_and_report_error(&cmd, http, handler.run(http, &cmd)).await;
    }
}

async fn register_commands(
    http: &Http,
    commands: &[Box<dyn CommandHandler>],
) -> anyhow::Result<()> {
    let registered_commands = Command::get_global_commands(http).await?;
    let registered_commands: HashSet<_> = registered_commands
        .iter()
        .map(|c| c.name.as_str())
        .collect();

    let our_commands: HashSet<_> = commands.iter().map(|c| c.name()).collect();

    if registered_commands != our_commands {
        // If the commands registered with Discord don't match the commands configured
        // for this bot, reset them entirely.
        Command::set_global_commands(http, vec![]).await?;
    }

    for command in commands {
        command.register(http).await?;
    }

    Ok(())
}
