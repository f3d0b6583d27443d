use serenity::all::CommandDataOption;

use crate::{
    constant::value as v,
    emote::Size,
    error::ResolveError,
    util::{self, value_to_bool, value_to_string},
};

/// The options of an `/emote` invocation, checked once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoteOptions {
    pub url: String,
    pub size: Option<Size>,
    /// Overrides the emote's own name.
    pub name: Option<String>,
    pub disable_animations: bool,
}
impl EmoteOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            size: None,
            name: None,
            disable_animations: false,
        }
    }

    pub fn parse(options: &[CommandDataOption]) -> Result<Self, ResolveError> {
        let non_blank = |s: String| {
            let s = s.trim().to_string();
            (!s.is_empty()).then_some(s)
        };

        let url = util::get_value(options, v::URL)
            .and_then(value_to_string)
            .and_then(non_blank)
            .ok_or(ResolveError::MissingInput)?;

        let size = util::get_value(options, v::SIZE)
            .and_then(value_to_string)
            .map(|s| s.parse::<Size>())
            .transpose()?;

        let name = util::get_value(options, v::NAME)
            .and_then(value_to_string)
            .and_then(non_blank);

        let disable_animations = util::get_value(options, v::DISABLE_ANIMATIONS)
            .and_then(value_to_bool)
            .unwrap_or(false);

        Ok(Self {
            url,
            size,
            name,
            disable_animations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(value: serde_json::Value) -> Vec<CommandDataOption> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_every_option() {
        let parsed = EmoteOptions::parse(&options(serde_json::json!([
            { "name": "url", "type": 3, "value": "https://7tv.app/emotes/abc123" },
            { "name": "size", "type": 3, "value": "2x" },
            { "name": "name", "type": 3, "value": "pog" },
            { "name": "disable_animations", "type": 5, "value": true },
        ])))
        .unwrap();

        assert_eq!(
            parsed,
            EmoteOptions {
                url: "https://7tv.app/emotes/abc123".into(),
                size: Some(Size::X2),
                name: Some("pog".into()),
                disable_animations: true,
            }
        );
    }

    #[test]
    fn optional_options_default() {
        let parsed = EmoteOptions::parse(&options(serde_json::json!([
            { "name": "url", "type": 3, "value": "https://7tv.app/emotes/abc123" },
        ])))
        .unwrap();

        assert_eq!(parsed, EmoteOptions::new("https://7tv.app/emotes/abc123"));
    }

    #[test]
    fn url_is_trimmed_once_at_the_boundary() {
        let parsed = EmoteOptions::parse(&options(serde_json::json!([
            { "name": "url", "type": 3, "value": "  https://7tv.app/emotes/abc123\n" },
        ])))
        .unwrap();

        assert_eq!(parsed.url, "https://7tv.app/emotes/abc123");
        assert_eq!(
            crate::emote::classify(&parsed.url),
            Some(crate::emote::Platform::SevenTv)
        );
    }

    #[test]
    fn missing_url_is_rejected() {
        assert!(matches!(
            EmoteOptions::parse(&[]),
            Err(ResolveError::MissingInput)
        ));
        assert!(matches!(
            EmoteOptions::parse(&options(serde_json::json!([
                { "name": "url", "type": 3, "value": "   " },
            ]))),
            Err(ResolveError::MissingInput)
        ));
    }

    #[test]
    fn unknown_size_is_rejected() {
        assert!(matches!(
            EmoteOptions::parse(&options(serde_json::json!([
                { "name": "url", "type": 3, "value": "https://7tv.app/emotes/abc123" },
                { "name": "size", "type": 3, "value": "8x" },
            ]))),
            Err(ResolveError::InvalidSize(size)) if size == "8x"
        ));
    }
}
