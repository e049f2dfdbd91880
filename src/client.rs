//! USGS Earthquake feed client.
//!
//! Provides blocking HTTP access to GeoJSON earthquake feeds.
//! Uses reqwest with rustls for TLS.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::errors::QuakemapError;
use crate::models::FeatureCollection;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for earthquake feeds.
const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Magnitude threshold of a USGS summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    All,
    M1,
    M2_5,
    M4_5,
    Significant,
}

impl Magnitude {
    const ALL: [Self; 5] = [Self::All, Self::M1, Self::M2_5, Self::M4_5, Self::Significant];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::M1 => "1.0",
            Self::M2_5 => "2.5",
            Self::M4_5 => "4.5",
            Self::Significant => "significant",
        }
    }
}

/// Time window of a USGS summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Hour,
    Day,
    Week,
    Month,
}

impl Window {
    const ALL: [Self; 4] = [Self::Hour, Self::Day, Self::Week, Self::Month];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// A USGS summary feed, named `<magnitude>_<window>` (e.g. `2.5_day`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedType {
    pub magnitude: Magnitude,
    pub window: Window,
}

impl FeedType {
    /// Every event from the past week.
    pub const ALL_WEEK: Self = Self::new(Magnitude::All, Window::Week);

    #[must_use]
    pub const fn new(magnitude: Magnitude, window: Window) -> Self {
        Self { magnitude, window }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.magnitude.as_str(), self.window.as_str())
    }
}

impl FromStr for FeedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let parsed = lower.rsplit_once('_').and_then(|(mag, span)| {
            let magnitude = Magnitude::ALL.into_iter().find(|m| m.as_str() == mag)?;
            let window = Window::ALL.into_iter().find(|w| w.as_str() == span)?;
            Some(Self::new(magnitude, window))
        });
        parsed.ok_or_else(|| format!("unknown feed type: {s}"))
    }
}

/// Where the feature collection comes from.
///
/// Passed explicitly into every fetch; there is no process-wide endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// One of the USGS summary feeds
    Summary(FeedType),
    /// Any endpoint serving a GeoJSON feature collection
    Url(String),
}

impl FeedSource {
    /// Resolve the full request URL against a base for summary feeds.
    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        match self {
            Self::Summary(feed_type) => {
                format!("{base_url}/earthquakes/feed/v1.0/summary/{feed_type}.geojson")
            }
            Self::Url(url) => url.clone(),
        }
    }
}

/// Short human-readable name for logs and banners.
impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary(feed_type) => write!(f, "{feed_type}"),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Client for GeoJSON earthquake feeds.
pub struct UsgsClient {
    client: Client,
    base_url: String,
}

impl UsgsClient {
    /// Create a new USGS client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self, QuakemapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: USGS_BASE_URL.to_string(),
        })
    }

    /// Fetch the feature collection for a feed source.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or response cannot be parsed.
    #[instrument(skip(self), fields(feed = %source))]
    pub fn fetch(&self, source: &FeedSource) -> Result<FeatureCollection, QuakemapError> {
        let url = source.url(&self.base_url);

        debug!("fetching feed from {}", url);

        let response = self.client.get(&url).send()?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuakemapError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        // Parse separately so malformed payloads surface as parse errors
        let body = response.text()?;
        let feed: FeatureCollection = serde_json::from_str(&body)?;
        feed.validate()?;

        debug!("fetched {} events", feed.features.len());
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;

    use super::*;

    /// Serve a fixed response at `/feed.geojson` on a local port.
    ///
    /// The blocking client must not run inside a tokio runtime, so the
    /// server gets its own thread and runtime.
    fn serve_fixed(status: StatusCode, body: &'static str) -> FeedSource {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.set_nonblocking(true).expect("nonblocking");
        let addr = listener.local_addr().expect("local addr");

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("runtime");
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("listener");
                let app = Router::new()
                    .route("/feed.geojson", get(move || async move { (status, body) }));
                axum::serve(listener, app).await.expect("serve");
            });
        });

        FeedSource::Url(format!("http://{addr}/feed.geojson"))
    }

    fn fetch(source: &FeedSource) -> Result<FeatureCollection, QuakemapError> {
        UsgsClient::new().expect("client").fetch(source)
    }

    #[test]
    fn test_feed_type_round_trip() {
        let types = [
            FeedType::new(Magnitude::All, Window::Hour),
            FeedType::ALL_WEEK,
            FeedType::new(Magnitude::M2_5, Window::Day),
            FeedType::new(Magnitude::Significant, Window::Week),
        ];

        for feed_type in types {
            let s = feed_type.to_string();
            let parsed: FeedType = s.parse().expect("failed to parse");
            assert_eq!(parsed, feed_type);
        }
    }

    #[test]
    fn test_feed_type_names() {
        let monthly = FeedType::new(Magnitude::M4_5, Window::Month);
        assert_eq!(monthly.to_string(), "4.5_month");

        let parsed = "SIGNIFICANT_DAY".parse::<FeedType>().expect("parse");
        assert_eq!(parsed, FeedType::new(Magnitude::Significant, Window::Day));
    }

    #[test]
    fn test_weekly_feed_url() {
        let url = FeedSource::Summary(FeedType::ALL_WEEK).url(USGS_BASE_URL);
        assert_eq!(
            url,
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
        );
    }

    #[test]
    fn test_custom_url_is_used_verbatim() {
        let source = FeedSource::Url("http://localhost:9000/quakes.geojson".into());
        assert_eq!(source.url(USGS_BASE_URL), "http://localhost:9000/quakes.geojson");
        assert_eq!(source.to_string(), "http://localhost:9000/quakes.geojson");
    }

    #[test]
    fn test_unknown_feed_type_rejected() {
        for name in ["all_year", "3.0_day", "week", "all_week_extra", ""] {
            assert!(name.parse::<FeedType>().is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_fetch_sample_feed() {
        let source = serve_fixed(StatusCode::OK, include_str!("../tools/sample_feed.json"));
        let feed = fetch(&source).expect("fetch");
        assert_eq!(feed.features.len(), 3);
    }

    #[test]
    fn test_server_error_status_is_api_error() {
        let source = serve_fixed(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded");
        match fetch(&source) {
            Err(QuakemapError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_is_parse_error() {
        let source = serve_fixed(StatusCode::OK, "not json");
        assert!(matches!(fetch(&source), Err(QuakemapError::Parse(_))));
    }

    #[test]
    fn test_wrong_geojson_type_is_invalid_response() {
        let source = serve_fixed(StatusCode::OK, r#"{"type":"Feature"}"#);
        assert!(matches!(fetch(&source), Err(QuakemapError::InvalidResponse(_))));
    }

    #[test]
    fn test_unreachable_endpoint_is_http_error() {
        let source = FeedSource::Url("http://127.0.0.1:9/feed.geojson".into());
        assert!(matches!(fetch(&source), Err(QuakemapError::Http(_))));
    }
}
