//! Feed download over HTTP(S).
//!
//! Uses the curl crate (libcurl) for a plain GET that follows redirects and
//! buffers the whole body. One attempt per run, bounded by the configured
//! timeout; failures surface as [`FetchError`] for the pipeline to report.

mod error;

pub use error::{classify_curl_error, FetchError, FetchErrorKind};

use std::time::Duration;

use crate::config::FeedConfig;

const MAX_REDIRECTS: u32 = 10;

/// Source of feed bodies. The pipeline only talks to this seam.
pub trait Fetch {
    /// Downloads `url` and returns the body as text.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// libcurl-backed fetcher with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    timeout: Duration,
    user_agent: String,
}

impl CurlFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(cfg: &FeedConfig) -> Self {
        Self::new(cfg.fetch_timeout(), cfg.user_agent.clone())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Fetch for CurlFetcher {
    /// Runs in the current thread; blocks for at most the configured timeout.
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut body: Vec<u8> = Vec::new();
        let err = |e| FetchError::transport(url, e);

        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(err)?;
        easy.get(true).map_err(err)?;
        easy.follow_location(true).map_err(err)?;
        easy.max_redirections(MAX_REDIRECTS).map_err(err)?;
        easy.useragent(&self.user_agent).map_err(err)?;
        easy.connect_timeout(self.timeout).map_err(err)?;
        easy.timeout(self.timeout).map_err(err)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(err)?;
            transfer.perform().map_err(err)?;
        }

        let status = easy.response_code().map_err(err)?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            });
        }

        tracing::debug!("fetched {} ({} bytes)", url, body.len());
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
