//! Downloading remote scripts to a local file.

use crate::error::RunnerError;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, EXPIRES, HeaderMap, HeaderValue, PRAGMA};
use std::fs::File;
use std::path::Path;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Something that can place the content behind a URL into a local file.
pub trait Fetch {
    /// Write the content at `url` into `dest`, truncating whatever is there.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the content cannot be retrieved or written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), RunnerError>;
}

/// HTTP(S) fetcher that always bypasses caches, so a freshly pushed script is picked up.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers
}

fn create_client() -> Result<Client, reqwest::Error> {
    // No total timeout: large scripts on slow links are fine, only stalled connects are not.
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(concat!("nipox/", env!("CARGO_PKG_VERSION")))
        .default_headers(no_cache_headers())
        .build()
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), RunnerError> {
        let transport = |source| RunnerError::Transport {
            url: url.to_string(),
            source,
        };

        let client = create_client().map_err(transport)?;
        let mut response = client.get(url).send().map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RunnerError::Download {
                url: url.to_string(),
                status: format!(
                    "{} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
            });
        }

        let mut file = File::create(dest).map_err(|e| RunnerError::stage(dest, e))?;
        response.copy_to(&mut file).map_err(transport)?;
        file.sync_all().map_err(|e| RunnerError::stage(dest, e))?;
        Ok(())
    }
}
