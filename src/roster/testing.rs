//! In-memory fetch double for tests

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

use super::fetch::{Fetch, FetchResponse};
use crate::error::FetchError;

/// Serves canned responses; unknown paths are 404
#[derive(Debug, Default, Clone)]
pub struct MapFetch {
    pages: HashMap<String, FetchResponse>,
    failures: HashSet<String>,
    delays: HashMap<String, Duration>,
}

impl MapFetch {
    pub fn with_page(self, path: &str, body: &str) -> Self {
        self.with_bytes(path, Some("text/html"), body.as_bytes().to_vec())
    }

    pub fn with_bytes(mut self, path: &str, content_type: Option<&str>, body: Vec<u8>) -> Self {
        self.pages
            .insert(path.to_string(), FetchResponse::ok(content_type, body));
        self
    }

    /// Requests for `path` fail at the transport level
    pub fn with_failure(mut self, path: &str) -> Self {
        self.failures.insert(path.to_string());
        self
    }

    /// Hold the response for `path` back by `delay`
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }
}

impl Fetch for MapFetch {
    fn get(&self, path: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send {
        let delay = self.delays.get(path).copied();
        let result = if self.failures.contains(path) {
            Err(FetchError::InvalidPath(path.to_string()))
        } else {
            Ok(self
                .pages
                .get(path)
                .cloned()
                .unwrap_or_else(FetchResponse::not_found))
        };

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }
}
