// crates/estat-core/src/config.rs

//! Fetcher configuration.
//!
//! There is no process-wide default credential. The application id travels in
//! a [`Config`] handed to [`crate::Fetcher::new`], and a per-call id (if any)
//! takes precedence over it.

/// Environment variable read by [`Config::from_env`].
pub const APP_ID_ENV: &str = "ESTAT_APP_ID";

#[derive(Debug, Clone)]
pub struct Config {
    /// Application id used when a fetch does not name one explicitly.
    pub app_id: Option<String>,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: None,
            user_agent: format!("estat-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Default configuration with `app_id` taken from `ESTAT_APP_ID`.
    pub fn from_env() -> Self {
        Self {
            app_id: std::env::var(APP_ID_ENV).ok(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Picks the application id for one request.
    ///
    /// An explicit, non-empty `explicit` wins; otherwise the configured id is
    /// used. Empty strings count as absent.
    pub fn resolve_app_id<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit
            .filter(|id| !id.is_empty())
            .or_else(|| self.app_id.as_deref().filter(|id| !id.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_id_beats_configured_id() {
        let config = Config::default().with_app_id("from-config");
        assert_eq!(config.resolve_app_id(Some("explicit")), Some("explicit"));
        assert_eq!(config.resolve_app_id(None), Some("from-config"));
    }

    #[test]
    fn empty_ids_count_as_absent() {
        let config = Config::default().with_app_id("");
        assert_eq!(config.resolve_app_id(Some("")), None);
        assert_eq!(config.resolve_app_id(None), None);

        let config = Config::default().with_app_id("abc");
        assert_eq!(config.resolve_app_id(Some("")), Some("abc"));
    }
}
