use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Url};

use crate::config::{Config, ConfigError};
use crate::error::{AppError, Result};
use crate::models::{parse_enrollment_code, parse_room_list, Room};
use crate::pulse::rate_limit::{Clock, RateLimiter, SystemClock};

/// Rate-limited client for the Pulse rooms API
pub struct PulseClient<C = SystemClock> {
    client: Client,
    base_url: Url,
    org_id: String,
    api_key: String,
    limiter: RateLimiter<C>,
}

impl PulseClient<SystemClock> {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> PulseClient<C> {
    pub fn with_clock(config: &Config, clock: C) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| ConfigError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(config.base_url.clone()).into());
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            org_id: config.org_id.clone(),
            api_key: config.api_key.clone(),
            limiter: RateLimiter::new(clock, config.rate_limit_delay),
        })
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    /// GET /orgs/{org_id}/rooms
    ///
    /// Transport failures propagate. A body of unexpected shape is logged and
    /// yields no rooms.
    pub async fn list_rooms(&mut self) -> Result<Vec<Room>> {
        let url = self.endpoint(&["orgs", self.org_id.as_str(), "rooms"])?;
        let body = self.request(Method::GET, url).await?;

        let rooms = match parse_room_list(&body) {
            Ok(rooms) => rooms,
            Err(e) => {
                tracing::warn!(error = %e, body = %body, "No rooms found in API response structure");
                Vec::new()
            }
        };

        tracing::info!(org_id = %self.org_id, count = rooms.len(), "Found rooms in organization");
        Ok(rooms)
    }

    /// POST /orgs/{org_id}/rooms/{room_id}/regenerate_dec
    ///
    /// Every failure is logged and reported as `None`.
    pub async fn regenerate_code(&mut self, room_id: &str) -> Option<String> {
        match self.try_regenerate_code(room_id).await {
            Ok(code) => {
                tracing::info!(room_id = %room_id, dec = %code, "Generated DEC");
                Some(code)
            }
            Err(e) if e.is_transport() => {
                tracing::warn!(room_id = %room_id, error = %e, "Failed to generate DEC");
                None
            }
            Err(e) => {
                tracing::warn!(room_id = %room_id, error = %e, "No DEC found in response");
                None
            }
        }
    }

    async fn try_regenerate_code(&mut self, room_id: &str) -> Result<String> {
        let url = self.endpoint(&[
            "orgs",
            self.org_id.as_str(),
            "rooms",
            room_id,
            "regenerate_dec",
        ])?;
        let body = self.request(Method::POST, url).await?;

        parse_enrollment_code(&body)
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                AppError::Config(ConfigError::InvalidBaseUrl(self.base_url.to_string()))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Rate-limited request returning the body of a 2xx response.
    async fn request(&mut self, method: Method, url: Url) -> Result<String> {
        self.limiter.wait().await;

        tracing::debug!(method = %method, url = %url, "Making request");
        let result = self.send(method, url).await;
        self.limiter.mark_completed();

        if let Err(e) = &result {
            tracing::warn!(error = %e, "API request failed");
        }
        result
    }

    async fn send(&self, method: Method, url: Url) -> Result<String> {
        let res = self
            .client
            .request(method, url.clone())
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(AppError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::rate_limit::tests::ManualClock;

    fn client(base_url: &str) -> PulseClient<ManualClock> {
        let mut config = Config::new("key", "org/1");
        config.base_url = base_url.to_string();
        PulseClient::with_clock(&config, ManualClock::new()).expect("Should build client")
    }

    #[test]
    fn test_endpoint_paths() {
        let client = client("https://api.pulse.neat.no/v1");

        let url = client
            .endpoint(&["orgs", client.org_id(), "rooms"])
            .expect("Should build url");
        assert_eq!(url.as_str(), "https://api.pulse.neat.no/v1/orgs/org%2F1/rooms");

        let url = client
            .endpoint(&["orgs", "o", "rooms", "room 7", "regenerate_dec"])
            .expect("Should build url");
        assert_eq!(
            url.as_str(),
            "https://api.pulse.neat.no/v1/orgs/o/rooms/room%207/regenerate_dec"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash_base() {
        let client = client("http://localhost:8080/v1/");
        let url = client.endpoint(&["orgs", "o", "rooms"]).expect("Should build url");
        assert_eq!(url.as_str(), "http://localhost:8080/v1/orgs/o/rooms");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let mut config = Config::new("key", "org");
        config.base_url = "mailto:ops@example.com".to_string();
        assert!(PulseClient::new(&config).is_err());
    }
}
