//! In-memory `Fetch` implementation for unit tests

use crate::crawler::fetcher::Fetch;
use crate::FetchError;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

/// Serves canned pages by URL and records every request in order
///
/// Unknown URLs answer with a 404 `FetchError`.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetch for FakeFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
