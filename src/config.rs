use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Configuration {
    pub authentication: Authentication,
    pub sources: Sources,
    pub logging: Logging,
}
impl Configuration {
    const FILENAME: &str = "config.toml";

    pub fn load() -> anyhow::Result<Self> {
        let config = if let Ok(file) = std::fs::read_to_string(Self::FILENAME) {
            toml::from_str(&file).context("failed to load config")?
        } else {
            Self::default()
        };
        config.save()?;

        Ok(config)
    }

    fn save(&self) -> anyhow::Result<()> {
        Ok(std::fs::write(
            Self::FILENAME,
            toml::to_string_pretty(self)?,
        )?)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Authentication {
    pub discord_token: Option<String>,
}

/// Endpoints of the services that turn an emote page URL into emote data.
///
/// Each endpoint is called as `GET {endpoint}?url={emote_url}` and is expected
/// to answer with the emote as JSON, or 404 if the emote does not exist.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Sources {
    pub bttv: String,
    pub seven_tv: String,
    /// Applies to both the resolver calls and the image download.
    pub request_timeout_secs: u64,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            bttv: "http://127.0.0.1:8080/bttv".into(),
            seven_tv: "http://127.0.0.1:8080/7tv".into(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Logging {
    /// A `tracing` filter directive. `RUST_LOG` takes precedence when set.
    pub filter: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            filter: "info,emotecord=debug".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Configuration = toml::from_str(
            r#"
[authentication]
discord_token = "abc"

[sources]
bttv = "http://resolver/bttv"
"#,
        )
        .unwrap();

        assert_eq!(config.authentication.discord_token.as_deref(), Some("abc"));
        assert_eq!(config.sources.bttv, "http://resolver/bttv");
        assert_eq!(config.sources.seven_tv, Sources::default().seven_tv);
        assert_eq!(config.sources.request_timeout_secs, 10);
        assert_eq!(config.logging.filter, "info,emotecord=debug");
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Configuration::default()).unwrap();
        let config: Configuration = toml::from_str(&text).unwrap();
        assert_eq!(config.sources.bttv, Sources::default().bttv);
        assert!(config.authentication.discord_token.is_none());
    }
}
