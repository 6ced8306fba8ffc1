// crates/estat-core/src/fetch.rs

//! Blocking HTTP fetcher: one GET per call, gzip body, JSON document.

use crate::config::Config;
use crate::document::StatsDocument;
use crate::endpoint::{normalize_url, redacted};
use crate::error::{EStatError, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT_ENCODING, USER_AGENT};
use tracing::{debug, info};
use url::Url;

pub struct Fetcher {
    client: Client,
    config: Config,
}

impl Fetcher {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Uses a caller-built client (proxy settings, TLS roots, ...).
    pub fn with_client(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalizes `url_template` and fetches the document behind it.
    ///
    /// `app_id` overrides the configured id for this call.
    pub fn fetch(&self, url_template: &str, app_id: Option<&str>) -> Result<StatsDocument> {
        let app_id = self
            .config
            .resolve_app_id(app_id)
            .ok_or(EStatError::MissingAppId)?;
        let url = normalize_url(url_template, app_id)?;
        self.get(url)
    }

    /// Issues the request against an already normalized URL.
    ///
    /// The body is gunzipped whatever `Content-Encoding` the server reports.
    pub fn get(&self, url: Url) -> Result<StatsDocument> {
        let shown = redacted(&url);
        info!(url = %shown, "fetching statistics");

        let response = self
            .client
            .get(url)
            .header(ACCEPT_ENCODING, "gzip")
            .header(USER_AGENT, self.config.user_agent.as_str())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(EStatError::Status {
                status: status.as_u16(),
                url: shown.to_string(),
            });
        }

        let body = response.bytes()?;
        debug!(bytes = body.len(), "received compressed body");
        let doc = StatsDocument::from_gzip_bytes(&body)?;
        info!(url = %shown, "fetched statistics");
        Ok(doc)
    }
}
