//! Blocking client for a Personalizer-style ranking service.
//!
//! [`PersonalizerClient`] implements [`RankingService`] with two JSON POSTs:
//! `personalizer/v1.0/rank` and `personalizer/v1.0/events/{eventId}/reward`.
//! Every call is synchronous and is not retried.

pub mod credentials;
pub mod error;

pub use credentials::Credentials;
pub use error::{CredentialsError, Result, ServiceError};

use autorank_core::{RankRequest, RankResponse, RankingService, RewardRequest};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://westus2.api.cognitive.microsoft.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const API_PREFIX: [&str; 2] = ["personalizer", "v1.0"];

macro_rules! warn_diag {
    ($($arg:tt)*) => {{
        #[cfg(feature = "telemetry")]
        tracing::warn!($($arg)*);
        #[cfg(not(feature = "telemetry"))]
        eprintln!("Warning: {}", format!($($arg)*));
    }};
}

macro_rules! debug_diag {
    ($($arg:tt)*) => {{
        #[cfg(feature = "telemetry")]
        tracing::debug!($($arg)*);
    }};
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `https://westus2.api.cognitive.microsoft.com/`.
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug)]
pub struct PersonalizerClient {
    http: Client,
    base: Url,
    credentials: Credentials,
}

impl PersonalizerClient {
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        let base = build_service_url(&config.endpoint, &[])?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ServiceError::Transport {
                url: base.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base,
            credentials,
        })
    }

    #[must_use]
    pub fn rank_url(&self) -> Url {
        extend_url(&self.base, &["rank"])
    }

    #[must_use]
    pub fn reward_url(&self, event_id: &str) -> Url {
        extend_url(&self.base, &["events", event_id, "reward"])
    }

    fn post<B: Serialize>(&self, url: &Url, body: &B) -> Result<Response> {
        debug_diag!(url = %url, "POST");
        let resp = self
            .http
            .post(url.clone())
            .header(SUBSCRIPTION_KEY_HEADER, self.credentials.api_key())
            .json(body)
            .send()
            .map_err(|source| ServiceError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ServiceError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }
        Ok(resp)
    }
}

impl RankingService for PersonalizerClient {
    type Error = ServiceError;

    fn rank(&mut self, request: &RankRequest) -> Result<RankResponse> {
        let url = self.rank_url();
        let response: RankResponse =
            self.post(&url, request)?
                .json()
                .map_err(|source| ServiceError::Decode {
                    url: url.to_string(),
                    source,
                })?;

        if response.event_id != request.request_id {
            warn_diag!(
                "service answered event {} for request {}",
                response.event_id,
                request.request_id
            );
        }
        debug_diag!(
            event_id = %response.event_id,
            chosen = %response.reward_action_id,
            ranked = response.ranking.len(),
            "rank response"
        );
        Ok(response)
    }

    fn reward(&mut self, event_id: &str, reward: RewardRequest) -> Result<()> {
        let url = self.reward_url(event_id);
        self.post(&url, &reward)?;
        debug_diag!(event_id = %event_id, value = reward.value, "reward posted");
        Ok(())
    }
}

/// Normalizes `base` to `<base>/personalizer/v1.0/<tail..>`.
///
/// A trailing slash or an already present `personalizer/v1.0` suffix is
/// accepted, so both the bare resource endpoint and the full API root work.
pub fn build_service_url(base: &str, tail: &[&str]) -> Result<Url> {
    let mut target_url =
        Url::parse(base).map_err(|e| ServiceError::Endpoint(format!("{base}: {e}")))?;

    let mut segments: Vec<String> = target_url
        .path_segments()
        .map(|iter| iter.map(String::from).collect())
        .unwrap_or_default();

    if let Some(last) = segments.last() {
        if last.is_empty() {
            segments.pop();
        }
    }

    if segments.ends_with(&[API_PREFIX[0].to_string(), API_PREFIX[1].to_string()]) {
        segments.pop();
        segments.pop();
    } else if segments.ends_with(&[API_PREFIX[0].to_string()]) {
        segments.pop();
    }

    target_url
        .path_segments_mut()
        .map_err(|()| {
            ServiceError::Endpoint(format!(
                "{base} cannot be used as a base URL (e.g. 'data:' or 'mailto:' schemes)"
            ))
        })?
        .clear()
        .extend(segments)
        .extend(API_PREFIX)
        .extend(tail);

    Ok(target_url)
}

fn extend_url(base: &Url, tail: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.extend(tail);
    }
    url
}
