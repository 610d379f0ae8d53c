use std::{future::Future, time::Duration};

use log::debug;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::RacePaceError;

use super::ApiRequest;

pub const DEFAULT_BASE_URL: &str = "https://f1-sim-backend.onrender.com";
// the hosted backend can take a while to wake up from idle
pub const DEFAULT_TIMEOUT_S: u64 = 30;

/// Source of raw prediction payloads.
///
/// Implementations perform exactly one attempt per call and never retry.
pub trait PredictionBackend: Send + Sync + 'static {
    fn fetch(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<Value, RacePaceError>> + Send;
}

pub struct HttpPredictionClient {
    client: Client,
    base_url: Url,
}

impl HttpPredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RacePaceError> {
        let mut parsed = Url::parse(base_url).map_err(|e| RacePaceError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            source: e,
        })?;
        // Url::join replaces the last path segment unless the base ends with a slash
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        // one dispatch is one GET, a redirect comes back as a non-2xx status
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| RacePaceError::HttpClient { source: e })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, request: &ApiRequest) -> Result<Url, RacePaceError> {
        let mut url =
            self.base_url
                .join(request.path())
                .map_err(|e| RacePaceError::InvalidBaseUrl {
                    base_url: self.base_url.to_string(),
                    source: e,
                })?;
        let query = request.query();
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        Ok(url)
    }
}

impl PredictionBackend for HttpPredictionClient {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, RacePaceError> {
        let url = self.endpoint(request)?;
        debug!("Sending {} to {}", request.name(), url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RacePaceError::Network {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RacePaceError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| RacePaceError::Network {
            url: url.to_string(),
            source: e,
        })?;
        // from_slice rejects invalid UTF-8 instead of replacing it
        serde_json::from_slice(&body).map_err(|e| RacePaceError::MalformedJson {
            url: url.to_string(),
            source: e,
        })
    }
}
