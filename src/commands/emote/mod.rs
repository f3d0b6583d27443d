use std::time::Duration;

use serenity::all::{
    Command, CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, Http,
    Permissions,
};
use tracing::Instrument as _;

use crate::{
    config,
    constant::{self, colour, reply, value as v},
    emote::{DisplayUrls, Emote, Platform, Size, classify, source::Sources},
    error::{EmoteError, ResolveError, UploadRejection},
};

use super::CommandHandler;

pub mod host;
pub mod options;

use host::{ChatHost, CreatedEmoji, Embed, InteractionHost};
use options::EmoteOptions;

pub struct Handler {
    sources: Sources,
    client: reqwest::Client,
}
impl Handler {
    pub fn new(config: &config::Configuration) -> anyhow::Result<Self> {
        Ok(Self {
            sources: Sources::from_config(&config.sources)?,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.sources.request_timeout_secs))
                .build()?,
        })
    }
}
#[serenity::async_trait]
impl CommandHandler for Handler {
    fn name(&self) -> &str {
        constant::commands::EMOTE
    }

    async fn register(&self, http: &Http) -> anyhow::Result<()> {
        let mut size_option = CreateCommandOption::new(
            CommandOptionType::String,
            v::SIZE,
            "The size of the emote. Larger sizes may exceed Discord's limit.",
        )
        .required(false);
        for size in Size::ALL {
            size_option = size_option.add_string_choice(size.token(), size.token());
        }

        Command::create_global_command(
            http,
            CreateCommand::new(constant::commands::EMOTE)
                .description("Upload an emote from BetterTTV or 7TV as a server emoji.")
                .default_member_permissions(Permissions::MANAGE_GUILD_EXPRESSIONS)
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        v::URL,
                        "The URL of the emote.",
                    )
                    .required(true),
                )
                .add_option(size_option)
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        v::NAME,
                        "The name of the emoji. Defaults to the emote's name.",
                    )
                    .min_length(2)
                    .max_length(32)
                    .required(false),
                )
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::Boolean,
                        v::DISABLE_ANIMATIONS,
                        "Upload a static image even if the emote is animated.",
                    )
                    .required(false),
                ),
        )
        .await?;
        Ok(())
    }

    async fn run(&self, http: &Http, cmd: &CommandInteraction) -> anyhow::Result<()> {
        let span = tracing::info_span!(
            "emote",
            user = %cmd.user.name,
            guild = ?cmd.guild_id.map(|g| g.get()),
        );

        async {
            let host = InteractionHost::new(http, cmd, self.client.clone());
            let options = EmoteOptions::parse(&cmd.data.options);
            tracing::debug!(?options, "options received");

            match run(&host, &self.sources, options).await? {
                Outcome::Succeeded(emoji) => tracing::info!(%emoji, "emote uploaded"),
                Outcome::Failed(err) => tracing::info!("emote not uploaded: {err}"),
            }
            Ok::<_, anyhow::Error>(())
        }
        .instrument(span)
        .await
    }
}

/// How an invocation ended. Either way the user has been told.
#[derive(Debug)]
pub enum Outcome {
    Succeeded(CreatedEmoji),
    Failed(EmoteError),
}

/// Drives a single `/emote` invocation from acknowledgement to the final reply.
///
/// Only failures to talk to Discord before the upload starts are returned as errors;
/// every failure of the emote itself ends in an [Outcome::Failed] reply.
pub async fn run(
    host: &dyn ChatHost,
    sources: &Sources,
    options: Result<EmoteOptions, ResolveError>,
) -> anyhow::Result<Outcome> {
    // Discord only waits a few seconds for the first response.
    host.defer().await?;

    let resolved = match resolve(sources, options).await {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::warn!("{err}");
            report_early_failure(host, &err).await?;
            return Ok(Outcome::Failed(err.into()));
        }
    };

    let invoker = host.invoker();
    let selected_url = resolved.selected_url().to_string();
    let mut embed = Embed::default()
        .author(&resolved.emote.author.name, &resolved.emote.author.avatar)
        .url(&resolved.options.url)
        .title(format!(
            "{} by {} ({})",
            resolved.emote.name, resolved.emote.author.name, resolved.platform
        ))
        .description(reply::UPLOADING)
        .thumbnail(&selected_url)
        .timestamp()
        .footer(format!("Executed by @{}", invoker.username))
        .colour(colour::PROGRESS);

    match upload(host, &resolved, &embed).await {
        Ok(emoji) => {
            embed = embed
                .description(format!(
                    "Emote {emoji} **{}** uploaded to Discord!",
                    emoji.name
                ))
                .thumbnail(&selected_url)
                .colour(colour::SUCCESS);
            if let Err(err) = host.edit_embed(&embed).await {
                tracing::warn!("emote uploaded but the reply could not be updated: {err:#}");
            }
            Ok(Outcome::Succeeded(emoji))
        }
        Err(EmoteError::NotInServerContext) => {
            tracing::error!("no guild to upload the emote to");
            report(host.edit_content(reply::NOT_IN_SERVER).await);
            Ok(Outcome::Failed(EmoteError::NotInServerContext))
        }
        Err(err) => {
            tracing::error!("error uploading emote or editing reply: {err}");
            let mut description = reply::UPLOAD_FAILED.to_string();
            if let EmoteError::UploadFailure(rejection) = &err {
                description += &format!("\n> {}", rejection.friendly_message());
            }
            embed = embed
                .description(description)
                .colour(colour::UPLOAD_FAILED);
            report(host.edit_embed(&embed).await);
            Ok(Outcome::Failed(err))
        }
    }
}

struct Resolved {
    options: EmoteOptions,
    platform: Platform,
    emote: Emote,
    urls: DisplayUrls,
}
impl Resolved {
    fn name(&self) -> &str {
        self.options.name.as_deref().unwrap_or(&self.emote.name)
    }

    fn selected_url(&self) -> &str {
        self.urls
            .select(self.emote.animated, self.options.disable_animations)
    }
}

async fn resolve(
    sources: &Sources,
    options: Result<EmoteOptions, ResolveError>,
) -> Result<Resolved, ResolveError> {
    let options = options?;

    let platform = classify(&options.url).ok_or(ResolveError::UnsupportedPlatform)?;
    tracing::debug!(%platform, "platform detected");

    let emote = sources
        .resolve(platform, &options.url)
        .await
        .map_err(ResolveError::AdapterFetchFailure)?
        .ok_or(ResolveError::EmoteNotFound)?;
    tracing::debug!(?emote, "fetched emote data");

    let urls = DisplayUrls::new(&emote, platform, options.size);
    tracing::debug!(
        animated_url = %urls.animated,
        static_url = %urls.r#static,
        "constructed emote URLs"
    );

    Ok(Resolved {
        options,
        platform,
        emote,
        urls,
    })
}

async fn upload(
    host: &dyn ChatHost,
    resolved: &Resolved,
    progress: &Embed,
) -> Result<CreatedEmoji, EmoteError> {
    host.edit_embed(progress)
        .await
        .map_err(|e| UploadRejection::new(format!("{e:#}")))?;

    let guild_id = host.guild_id().ok_or(EmoteError::NotInServerContext)?;

    tracing::debug!(%guild_id, name = resolved.name(), "uploading emote to guild");
    let reason = format!("@{} used /{}", host.invoker().username, constant::commands::EMOTE);
    Ok(host
        .create_guild_emoji(guild_id, resolved.selected_url(), resolved.name(), &reason)
        .await?)
}

async fn report_early_failure(host: &dyn ChatHost, err: &ResolveError) -> anyhow::Result<()> {
    match err {
        ResolveError::MissingInput => host.edit_content(reply::URL_REQUIRED).await,
        ResolveError::InvalidSize(size) => {
            let sizes: Vec<_> = Size::ALL.iter().map(|s| s.token()).collect();
            host.edit_content(&format!(
                "`❌` Invalid size `{size}`. Supported sizes: `{}`",
                sizes.join(", ")
            ))
            .await
        }
        ResolveError::AdapterFetchFailure(_) => host.edit_content(reply::FETCH_FAILED).await,
        ResolveError::UnsupportedPlatform => {
            host.edit_embed(&error_embed(host, reply::UNSUPPORTED_PLATFORM))
                .await
        }
        ResolveError::EmoteNotFound => host.edit_embed(&error_embed(host, reply::NOT_FOUND)).await,
    }
}

fn error_embed(host: &dyn ChatHost, description: &str) -> Embed {
    let invoker = host.invoker();
    Embed::default()
        .title("Error")
        .author(&invoker.display_name, &invoker.avatar_url)
        .timestamp()
        .colour(colour::ERROR)
        .description(description)
}

/// The final reply has nowhere left to report to, so failures are only logged.
fn report(result: anyhow::Result<()>) {
    if let Err(err) = result {
        tracing::error!("failed to send the final reply: {err:#}");
    }
}
