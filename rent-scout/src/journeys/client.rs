//! Journey service HTTP client.
//!
//! Issues a single journey-options query between an origin and destination,
//! normalizes the candidates (primary mode, route label, deadline-distance
//! ordering) and maps the service's failure modes onto [`JourneyError`].

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::{StatusCode, Url};

use crate::domain::{Coordinate, Journey, Mode};

use super::convert::{convert_journey, sort_journeys};
use super::error::JourneyError;
use super::types::{JourneysDto, MessageDto};

/// Default base URL for the journey service.
const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// The 404 body message that means "valid query, no route" rather than an
/// unresolvable place.
const NO_JOURNEY_MESSAGE: &str = "No journey found for your inputs.";

/// The starting point of a journey query.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// An exact coordinate.
    Point(Coordinate),
    /// A free-text place name, resolved by the routing service. Resolution
    /// can fail with [`JourneyError::PlaceNotFound`].
    Place(String),
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Point(coordinate) => write!(f, "{coordinate}"),
            Origin::Place(name) => f.write_str(name),
        }
    }
}

/// Seam over the journey query, letting the feasibility evaluator run
/// against the real client, a retry-wrapped client or a test double.
#[async_trait]
pub trait JourneySource: Send + Sync {
    /// Fetch candidate journeys from `from` to `to`.
    ///
    /// With `arrive_by`, the query asks for journeys arriving by that
    /// instant and candidates come back ordered by closeness of departure
    /// to it; without, it is a depart-now query ordered by arrival.
    /// "No journey found" is an empty vec, not an error.
    async fn journeys(
        &self,
        from: &Origin,
        to: Coordinate,
        arrive_by: Option<DateTime<Utc>>,
    ) -> Result<Vec<Journey>, JourneyError>;
}

/// Configuration for the journey client.
#[derive(Debug, Clone)]
pub struct JourneyConfig {
    /// Application key sent with every request.
    pub app_key: String,
    /// Base URL for the API (defaults to production).
    pub base_url: String,
    /// Local timezone used to stamp depart-now queries.
    pub timezone: FixedOffset,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl JourneyConfig {
    /// Create a new config with the given application key.
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timezone: Utc.fix(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the local timezone for depart-now queries.
    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Journey service client.
#[derive(Debug, Clone)]
pub struct JourneyClient {
    http: reqwest::Client,
    base_url: Url,
    app_key: String,
    timezone: FixedOffset,
}

impl JourneyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: JourneyConfig) -> Result<Self, JourneyError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| JourneyError::Config(format!("bad base URL: {e}")))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("rent-scout/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            app_key: config.app_key,
            timezone: config.timezone,
        })
    }

    fn journey_url(&self, from: &Origin, to: Coordinate) -> Result<Url, JourneyError> {
        let from_segment = from.to_string();
        let to_segment = to.to_string();
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| JourneyError::Config("base URL cannot carry path segments".to_string()))?
            .extend([
                "Journey",
                "JourneyResults",
                from_segment.as_str(),
                "to",
                to_segment.as_str(),
            ]);
        Ok(url)
    }

    fn time_params(&self, arrive_by: Option<DateTime<Utc>>) -> [(&'static str, String); 3] {
        match arrive_by {
            Some(deadline) => [
                ("date", deadline.format("%Y%m%d").to_string()),
                ("time", deadline.format("%H%M").to_string()),
                ("timeIs", "arriving".to_string()),
            ],
            None => {
                let now = Utc::now().with_timezone(&self.timezone);
                [
                    ("date", now.format("%Y%m%d").to_string()),
                    ("time", now.format("%H%M").to_string()),
                    ("timeIs", "departing".to_string()),
                ]
            }
        }
    }
}

#[async_trait]
impl JourneySource for JourneyClient {
    async fn journeys(
        &self,
        from: &Origin,
        to: Coordinate,
        arrive_by: Option<DateTime<Utc>>,
    ) -> Result<Vec<Journey>, JourneyError> {
        let url = self.journey_url(from, to)?;

        let mode_param = Mode::ALL
            .iter()
            .map(|mode| mode.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let mut params = vec![("app_key", self.app_key.clone()), ("mode", mode_param)];
        params.extend(self.time_params(arrive_by));

        let response = self.http.get(url).query(&params).send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(JourneyError::RateLimited { retry_after });
        }
        if status == StatusCode::NOT_FOUND {
            let message = serde_json::from_str::<MessageDto>(&body)
                .map(|dto| dto.message)
                .unwrap_or_default();
            if message == NO_JOURNEY_MESSAGE {
                tracing::debug!(destination = %to, "no journey found");
                return Ok(Vec::new());
            }
            return Err(JourneyError::PlaceNotFound {
                message: if message.is_empty() {
                    snippet(&body)
                } else {
                    message
                },
            });
        }
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(JourneyError::Server {
                message: snippet(&body),
            });
        }
        if status == StatusCode::BAD_GATEWAY {
            return Err(JourneyError::Gateway {
                message: snippet(&body),
            });
        }
        if !status.is_success() {
            return Err(JourneyError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let dto: JourneysDto = serde_json::from_str(&body).map_err(|e| JourneyError::Json {
            message: format!("{e} (body: {})", snippet(&body)),
        })?;

        let mut journeys = dto
            .journeys
            .iter()
            .map(convert_journey)
            .collect::<Result<Vec<_>, _>>()?;
        sort_journeys(&mut journeys, arrive_by);
        Ok(journeys)
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
