// crates/estat-core/src/endpoint.rs

//! URL template normalization.
//!
//! API URLs are usually copied from the e-Stat site and look like
//! `http://api.e-stat.go.jp/rest/3.0/app/getStatsData?appId=&statsDataId=...`.
//! Before a request is made the template is patched:
//!
//! 1. the scheme is forced to `https`;
//! 2. the application id is written into the empty `appId=` placeholder;
//! 3. the generic `/app/` path segment is switched to the JSON flavor `/app/json/`.
//!
//! All three steps are idempotent, so normalizing an already normalized URL
//! is a no-op.

use crate::error::{EStatError, Result};
use tracing::{debug, warn};
use url::Url;

pub const APP_ID_PLACEHOLDER: &str = "appId=";
pub const GENERIC_PATH: &str = "/app/";
pub const JSON_PATH: &str = "/app/json/";

/// Runs all normalization steps and parses the result.
pub fn normalize_url(template: &str, app_id: &str) -> Result<Url> {
    if app_id.is_empty() {
        return Err(EStatError::MissingAppId);
    }

    let url = force_https(template);
    let url = fill_app_id(&url, app_id)?;
    let url = select_json_flavor(&url)?;

    let parsed = Url::parse(&url).map_err(|e| EStatError::invalid_url(template, e.to_string()))?;
    debug!(url = %redacted(&parsed), "normalized request URL");
    Ok(parsed)
}

/// `http://...` becomes `https://...`; anything else is returned unchanged.
pub fn force_https(url: &str) -> String {
    match url.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http://") => format!("https://{}", &url[7..]),
        _ => url.to_string(),
    }
}

/// Writes `app_id` into the `appId=` query placeholder.
///
/// A placeholder that already carries a value is left alone.
pub fn fill_app_id(url: &str, app_id: &str) -> Result<String> {
    let query_start = url.find('?').map(|i| i + 1).ok_or_else(|| {
        EStatError::invalid_url(url, "no query string with an `appId=` placeholder")
    })?;
    let query_end = url[query_start..]
        .find('#')
        .map_or(url.len(), |i| query_start + i);

    let mut offset = query_start;
    for param in url[query_start..query_end].split('&') {
        if let Some(value) = param.strip_prefix(APP_ID_PLACEHOLDER) {
            if !value.is_empty() {
                warn!("`appId` placeholder already has a value; leaving it untouched");
                return Ok(url.to_string());
            }
            let at = offset + APP_ID_PLACEHOLDER.len();
            let encoded: String = url::form_urlencoded::byte_serialize(app_id.as_bytes()).collect();
            return Ok(format!("{}{}{}", &url[..at], encoded, &url[at..]));
        }
        offset += param.len() + 1;
    }

    Err(EStatError::invalid_url(url, "no `appId=` placeholder"))
}

/// Switches the generic API path to the JSON one unless already selected.
pub fn select_json_flavor(url: &str) -> Result<String> {
    if url.contains(JSON_PATH) {
        return Ok(url.to_string());
    }
    if !url.contains(GENERIC_PATH) {
        return Err(EStatError::invalid_url(url, "no `/app/` path segment"));
    }
    Ok(url.replacen(GENERIC_PATH, JSON_PATH, 1))
}

/// Copy of `url` with the application id masked, for logs.
pub fn redacted(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appId" && !v.is_empty() {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut masked = url.clone();
    if !pairs.is_empty() {
        masked.query_pairs_mut().clear().extend_pairs(pairs);
    }
    masked
}
