use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use reqwest::StatusCode;
use url::Url;

use super::{Emote, Platform};
use crate::config;

/// Looks up emote data for an emote page URL.
///
/// `Ok(None)` means the lookup worked but the emote does not exist.
#[serenity::async_trait]
pub trait EmoteSource: Send + Sync {
    async fn resolve(&self, url: &str) -> anyhow::Result<Option<Emote>>;
}

/// One source per supported platform.
#[derive(Clone)]
pub struct Sources {
    pub bttv: Arc<dyn EmoteSource>,
    pub seven_tv: Arc<dyn EmoteSource>,
}
impl Sources {
    pub fn from_config(config: &config::Sources) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            bttv: Arc::new(
                HttpSource::new(&config.bttv, client.clone())
                    .context("invalid sources.bttv endpoint")?,
            ),
            seven_tv: Arc::new(
                HttpSource::new(&config.seven_tv, client)
                    .context("invalid sources.seven_tv endpoint")?,
            ),
        })
    }

    pub fn get(&self, platform: Platform) -> &dyn EmoteSource {
        match platform {
            Platform::Bttv => self.bttv.as_ref(),
            Platform::SevenTv => self.seven_tv.as_ref(),
        }
    }

    pub async fn resolve(&self, platform: Platform, url: &str) -> anyhow::Result<Option<Emote>> {
        self.get(platform).resolve(url).await
    }
}

/// Asks an external resolver service for the emote, which answers with [Emote] as JSON.
pub struct HttpSource {
    endpoint: Url,
    client: reqwest::Client,
}
impl HttpSource {
    pub fn new(endpoint: &str, client: reqwest::Client) -> anyhow::Result<Self> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            client,
        })
    }

    fn request_url(&self, emote_url: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("url", emote_url);
        url
    }
}
#[serenity::async_trait]
impl EmoteSource for HttpSource {
    async fn resolve(&self, url: &str) -> anyhow::Result<Option<Emote>> {
        let response = self.client.get(self.request_url(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let emote = response
            .error_for_status()?
            .json::<Emote>()
            .await
            .context("resolver returned malformed emote data")?;
        Ok(Some(emote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);
    #[serenity::async_trait]
    impl EmoteSource for Fixed {
        async fn resolve(&self, _url: &str) -> anyhow::Result<Option<Emote>> {
            Ok(self.0.map(|name| Emote {
                name: name.into(),
                author: super::super::Author {
                    name: "x".into(),
                    avatar: String::new(),
                },
                host_url: String::new(),
                animated: false,
            }))
        }
    }

    #[test]
    fn request_url_encodes_the_emote_url() {
        let source = HttpSource::new("http://resolver:8080/7tv", reqwest::Client::new()).unwrap();
        assert_eq!(
            source
                .request_url("https://7tv.app/emotes/abc123?x=1&y=2")
                .as_str(),
            "http://resolver:8080/7tv?url=https%3A%2F%2F7tv.app%2Femotes%2Fabc123%3Fx%3D1%26y%3D2"
        );
    }

    #[tokio::test]
    async fn resolver_status_codes_map_to_results() {
        use crate::util::testing::{Route, serve};

        let base = serve(vec![
            Route::new("/missing", 404, "text/plain", "not found"),
            Route::new("/broken", 500, "text/plain", "internal error"),
            Route::new(
                "/ok",
                200,
                "application/json",
                r#"{
                    "name": "PogU",
                    "author": { "name": "x", "avatar": "https://cdn/avatar.png" },
                    "hostURL": "https://cdn/emote/{{size}}",
                    "animated": true
                }"#,
            ),
            Route::new("/garbage", 200, "application/json", "{\"name\": 1}"),
        ])
        .await;
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let source =
            |path: &str| HttpSource::new(&format!("{base}{path}"), client.clone()).unwrap();
        let url = "https://7tv.app/emotes/abc123";

        assert!(source("/missing").resolve(url).await.unwrap().is_none());
        assert!(source("/broken").resolve(url).await.is_err());
        assert!(source("/garbage").resolve(url).await.is_err());

        let emote = source("/ok").resolve(url).await.unwrap().unwrap();
        assert_eq!(emote.name, "PogU");
        assert_eq!(emote.author.name, "x");
        assert_eq!(emote.host_url, "https://cdn/emote/{{size}}");
        assert!(emote.animated);
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(HttpSource::new("not a url", reqwest::Client::new()).is_err());
    }

    #[tokio::test]
    async fn sources_dispatch_by_platform() {
        let sources = Sources {
            bttv: Arc::new(Fixed(Some("bttv"))),
            seven_tv: Arc::new(Fixed(Some("7tv"))),
        };

        let bttv = sources.resolve(Platform::Bttv, "").await.unwrap().unwrap();
        let seven_tv = sources.resolve(Platform::SevenTv, "").await.unwrap().unwrap();
        assert_eq!(bttv.name, "bttv");
        assert_eq!(seven_tv.name, "7tv");
    }

    #[test]
    fn sources_build_from_default_config() {
        assert!(Sources::from_config(&config::Sources::default()).is_ok());
    }
}
