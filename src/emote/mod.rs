use std::{fmt, str::FromStr};

use serde::Deserialize;
use url::Url;

use crate::error::ResolveError;

pub mod source;

/// Placeholder in [Emote::host_url] that is replaced by a [Size] token.
pub const SIZE_PLACEHOLDER: &str = "{{size}}";

/// An emote as returned by a source, normalized across platforms.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Emote {
    pub name: String,
    pub author: Author,
    #[serde(rename = "hostURL")]
    pub host_url: String,
    pub animated: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Bttv,
    SevenTv,
}
impl Platform {
    /// The largest size the platform's CDN serves.
    pub fn max_size(self) -> Size {
        match self {
            Platform::Bttv => Size::X3,
            Platform::SevenTv => Size::X4,
        }
    }
}
impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Bttv => "bttv",
            Platform::SevenTv => "7tv",
        })
    }
}

/// Works out which platform an emote URL belongs to from its shape alone.
///
/// Accepts `https://betterttv.com/emotes/{id}` and `https://7tv.app/emotes/{id}`
/// (plus their `www.` variants and `old.7tv.app`), with an optional trailing slash.
pub fn classify(url: &str) -> Option<Platform> {
    let url = Url::parse(url).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let platform = match url.host_str()? {
        "betterttv.com" | "www.betterttv.com" => Platform::Bttv,
        "7tv.app" | "www.7tv.app" | "old.7tv.app" => Platform::SevenTv,
        _ => return None,
    };

    let segments: Vec<_> = url.path_segments()?.collect();
    let id = match segments[..] {
        ["emotes", id] | ["emotes", id, ""] => id,
        _ => return None,
    };
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(platform)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Size {
    X1,
    X2,
    X3,
    X4,
}
impl Size {
    pub const ALL: [Size; 4] = [Size::X1, Size::X2, Size::X3, Size::X4];

    pub fn token(self) -> &'static str {
        match self {
            Size::X1 => "1x",
            Size::X2 => "2x",
            Size::X3 => "3x",
            Size::X4 => "4x",
        }
    }

    /// Clamps the size to the largest tier `platform` serves.
    pub fn for_platform(self, platform: Platform) -> Size {
        self.min(platform.max_size())
    }
}
impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
impl FromStr for Size {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::ALL
            .into_iter()
            .find(|size| size.token() == s)
            .ok_or_else(|| ResolveError::InvalidSize(s.to_string()))
    }
}

/// The two image URLs that can be shown and uploaded for an emote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUrls {
    pub animated: String,
    pub r#static: String,
}
impl DisplayUrls {
    pub const DEFAULT_ANIMATED_SIZE: Size = Size::X2;
    pub const DEFAULT_STATIC_SIZE: Size = Size::X4;

    pub fn new(emote: &Emote, platform: Platform, size: Option<Size>) -> Self {
        // Only a requested size is clamped; the defaults are used as they are.
        let size = size.map(|size| size.for_platform(platform));
        let substitute = |default: Size, extension: &str| {
            let size = size.unwrap_or(default);
            format!(
                "{}{extension}",
                emote.host_url.replace(SIZE_PLACEHOLDER, size.token())
            )
        };

        Self {
            animated: substitute(Self::DEFAULT_ANIMATED_SIZE, ".gif"),
            r#static: substitute(Self::DEFAULT_STATIC_SIZE, ".webp"),
        }
    }

    /// The URL to display and upload: animated only if the emote is and animations are allowed.
    pub fn select(&self, animated: bool, disable_animations: bool) -> &str {
        if animated && !disable_animations {
            &self.animated
        } else {
            &self.r#static
        }
    }
}
