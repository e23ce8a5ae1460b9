use log::debug;

use crate::error::{ExtractError, Result};

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// GET a URL and return its body as text
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        let resp = self.client.get(url).header("User-Agent", USER_AGENT).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExtractError::FetchFailed {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }
        Ok(resp.text().await?)
    }
}
