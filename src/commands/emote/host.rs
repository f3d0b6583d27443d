use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_ENGINE};
use serenity::all::{
    CommandInteraction, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter,
    EditInteractionResponse, GuildId, Http, Timestamp, User,
};

use crate::error::UploadRejection;

/// Everything the emote command needs from Discord for a single interaction.
#[serenity::async_trait]
pub trait ChatHost: Send + Sync {
    fn invoker(&self) -> &Invoker;
    fn guild_id(&self) -> Option<GuildId>;

    async fn defer(&self) -> anyhow::Result<()>;
    async fn edit_content(&self, content: &str) -> anyhow::Result<()>;
    async fn edit_embed(&self, embed: &Embed) -> anyhow::Result<()>;
    async fn create_guild_emoji(
        &self,
        guild_id: GuildId,
        image_url: &str,
        name: &str,
        reason: &str,
    ) -> Result<CreatedEmoji, UploadRejection>;
}

/// The user that ran the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
}
impl From<&User> for Invoker {
    fn from(user: &User) -> Self {
        Self {
            username: user.name.clone(),
            display_name: user.global_name.clone().unwrap_or_else(|| user.name.clone()),
            avatar_url: user.face(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEmoji {
    pub id: u64,
    pub name: String,
    pub animated: bool,
}
impl fmt::Display for CreatedEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.animated {
            write!(f, "<a:{}:{}>", self.name, self.id)
        } else {
            write!(f, "<:{}:{}>", self.name, self.id)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Option<EmbedAuthor>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub footer: Option<String>,
    pub colour: Option<u32>,
    /// Stamp the embed with the time it is sent.
    pub timestamp: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedAuthor {
    pub name: String,
    pub icon_url: String,
}

impl Embed {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn author(mut self, name: impl Into<String>, icon_url: impl Into<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url: icon_url.into(),
        });
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }
}

impl From<&Embed> for CreateEmbed {
    fn from(embed: &Embed) -> Self {
        let mut out = CreateEmbed::new();
        if let Some(title) = &embed.title {
            out = out.title(title);
        }
        if let Some(url) = &embed.url {
            out = out.url(url);
        }
        if let Some(author) = &embed.author {
            out = out.author(CreateEmbedAuthor::new(&author.name).icon_url(&author.icon_url));
        }
        if let Some(description) = &embed.description {
            out = out.description(description);
        }
        if let Some(thumbnail) = &embed.thumbnail {
            out = out.thumbnail(thumbnail);
        }
        if let Some(footer) = &embed.footer {
            out = out.footer(CreateEmbedFooter::new(footer));
        }
        if let Some(colour) = embed.colour {
            out = out.colour(colour);
        }
        if embed.timestamp {
            out = out.timestamp(Timestamp::now());
        }
        out
    }
}

/// [ChatHost] backed by a live slash command interaction.
pub struct InteractionHost<'a> {
    http: &'a Http,
    cmd: &'a CommandInteraction,
    client: reqwest::Client,
    invoker: Invoker,
}
impl<'a> InteractionHost<'a> {
    pub fn new(http: &'a Http, cmd: &'a CommandInteraction, client: reqwest::Client) -> Self {
        Self {
            http,
            cmd,
            client,
            invoker: Invoker::from(&cmd.user),
        }
    }
}

/// Discord refuses emoji images larger than this.
pub const MAX_EMOJI_BYTES: usize = 256 * 1024;

fn too_big() -> UploadRejection {
    UploadRejection::new(format!("Asset exceeds maximum size: {MAX_EMOJI_BYTES}"))
}

/// Downloads the image and turns it into the data URI Discord expects for emoji uploads.
///
/// Stops reading as soon as the image is known to exceed [MAX_EMOJI_BYTES].
async fn download_image(
    client: &reqwest::Client,
    image_url: &str,
) -> Result<String, UploadRejection> {
    let mut response = client.get(image_url).send().await?.error_for_status()?;
    if response
        .content_length()
        .is_some_and(|len| len > MAX_EMOJI_BYTES as u64)
    {
        return Err(too_big());
    }

    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| mime_from_extension(image_url).to_owned());

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        bytes.extend_from_slice(&chunk);
        if bytes.len() > MAX_EMOJI_BYTES {
            return Err(too_big());
        }
    }

    Ok(format!("data:{mime};base64,{}", BASE64_ENGINE.encode(bytes)))
}

fn mime_from_extension(url: &str) -> &'static str {
    if url.ends_with(".gif") {
        "image/gif"
    } else if url.ends_with(".webp") {
        "image/webp"
    } else {
        "image/png"
    }
}

#[serenity::async_trait]
impl ChatHost for InteractionHost<'_> {
    fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    fn guild_id(&self) -> Option<GuildId> {
        self.cmd.guild_id
    }

    async fn defer(&self) -> anyhow::Result<()> {
        Ok(self.cmd.defer(self.http).await?)
    }

    async fn edit_content(&self, content: &str) -> anyhow::Result<()> {
        self.cmd
            .edit_response(
                self.http,
                EditInteractionResponse::new()
                    .content(content)
                    .embeds(vec![]),
            )
            .await?;
        Ok(())
    }

    async fn edit_embed(&self, embed: &Embed) -> anyhow::Result<()> {
        self.cmd
            .edit_response(
                self.http,
                EditInteractionResponse::new().embeds(vec![CreateEmbed::from(embed)]),
            )
            .await?;
        Ok(())
    }

    async fn create_guild_emoji(
        &self,
        guild_id: GuildId,
        image_url: &str,
        name: &str,
        reason: &str,
    ) -> Result<CreatedEmoji, UploadRejection> {
        let image = download_image(&self.client, image_url).await?;
        let map = serde_json::json!({
            "name": name,
            "image": image,
        });
        let emoji = self.http.create_emoji(guild_id, &map, Some(reason)).await?;

        Ok(CreatedEmoji {
            id: emoji.id.get(),
            name: emoji.name,
            animated: emoji.animated,
        })
    }
}
