// In-memory HttpFetch double shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use url::Url;

use super::fetcher::HttpFetch;
use crate::error::{Result, RetrievalError};

#[derive(Default)]
pub struct StaticFetcher {
    routes: HashMap<String, std::result::Result<Bytes, StatusCode>>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<Bytes>) -> Self {
        self.routes.insert(url.to_string(), Ok(body.into()));
        self
    }

    pub fn failing(mut self, url: &str, status: StatusCode) -> Self {
        self.routes.insert(url.to_string(), Err(status));
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetch for StaticFetcher {
    async fn fetch_bytes(&self, url: &Url) -> Result<Bytes> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.routes.get(url.as_str()) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(RetrievalError::http_status(*status, url.as_str())),
            None => Err(RetrievalError::http_status(StatusCode::NOT_FOUND, url.as_str())),
        }
    }
}
