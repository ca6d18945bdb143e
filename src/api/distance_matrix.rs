use anyhow::{Context, Result, anyhow, bail, ensure};
use clap::ValueEnum;
use geo::Point;
use serde::Deserialize;
use std::time::Duration;

pub const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";
const USER_AGENT: &str = concat!("drivetimes/", env!("CARGO_PKG_VERSION"));

/// Travel mode passed to the routing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

/// Per-cell status reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxRouteLengthExceeded,
    #[serde(other)]
    Unknown,
}

/// Result for one matched origin/destination pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairOutcome {
    pub status: ElementStatus,
    pub duration_secs: Option<u64>,
}

impl PairOutcome {
    pub fn ok(duration_secs: u64) -> Self {
        Self {
            status: ElementStatus::Ok,
            duration_secs: Some(duration_secs),
        }
    }

    pub fn failed(status: ElementStatus) -> Self {
        Self {
            status,
            duration_secs: None,
        }
    }

    /// Duration in seconds, only for successful cells
    pub fn duration(&self) -> Option<u64> {
        match self.status {
            ElementStatus::Ok => self.duration_secs,
            _ => None,
        }
    }
}

/// A service that resolves travel durations for matched pairs.
///
/// `submit` receives equally long origin and destination lists and
/// returns one outcome per index `k`, describing `origins[k]` to
/// `destinations[k]`, in the same order.
pub trait RouteMatrix {
    fn submit(&self, origins: &[Point<f64>], destinations: &[Point<f64>])
    -> Result<Vec<PairOutcome>>;
}

/// Raw Distance Matrix API response
#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    pub status: ElementStatus,
    #[serde(default)]
    pub duration: Option<Measure>,
}

/// A value with its human readable rendering, e.g. `{"value": 754, "text": "13 mins"}`
#[derive(Debug, Deserialize)]
pub struct Measure {
    pub value: u64,
    #[serde(default)]
    pub text: Option<String>,
}

impl DistanceMatrixResponse {
    /// Fail unless the request as a whole succeeded
    pub fn check_status(&self) -> Result<()> {
        if self.status != "OK" {
            match &self.error_message {
                Some(message) => bail!(
                    "Distance Matrix API returned status {}: {}",
                    self.status,
                    message
                ),
                None => bail!("Distance Matrix API returned status {}", self.status),
            }
        }
        Ok(())
    }

    /// Extract cells (k, k) for k in 0..len.
    ///
    /// The service computes the full origins x destinations grid; only the
    /// diagonal corresponds to a generated pair.
    pub fn diagonal(&self, len: usize) -> Result<Vec<PairOutcome>> {
        (0..len)
            .map(|k| {
                let element = self
                    .rows
                    .get(k)
                    .and_then(|row| row.elements.get(k))
                    .ok_or_else(|| anyhow!("Distance Matrix response has no element ({k}, {k})"))?;

                Ok(PairOutcome {
                    status: element.status,
                    duration_secs: element.duration.as_ref().map(|d| d.value),
                })
            })
            .collect()
    }
}

/// Google Distance Matrix client
pub struct GoogleDistanceMatrix {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    mode: TravelMode,
}

impl GoogleDistanceMatrix {
    /// Build a client. `timeout` of `None` waits indefinitely.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        mode: TravelMode,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            mode,
        })
    }

    /// The GET request for one batch, without sending it
    pub fn build_request(
        &self,
        origins: &[Point<f64>],
        destinations: &[Point<f64>],
    ) -> reqwest::Result<reqwest::blocking::Request> {
        let origins = format_locations(origins);
        let destinations = format_locations(destinations);

        self.client
            .get(self.endpoint.as_str())
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("mode", self.mode.as_str()),
                ("units", "metric"),
                ("key", self.api_key.as_str()),
            ])
            .build()
    }

    fn fetch(&self, origins: &[Point<f64>], destinations: &[Point<f64>]) -> Result<DistanceMatrixResponse> {
        // Errors carry the request URL, which includes the key
        let request = self
            .build_request(origins, destinations)
            .map_err(|e| e.without_url())
            .context("Failed to build Distance Matrix request")?;

        let response = self
            .client
            .execute(request)
            .map_err(|e| e.without_url())
            .context("Failed to send request to Distance Matrix API")?;

        check_http_status(response.status())?;

        response
            .json()
            .map_err(|e| e.without_url())
            .context("Failed to parse Distance Matrix JSON response")
    }
}

fn check_http_status(status: reqwest::StatusCode) -> Result<()> {
    if !status.is_success() {
        bail!("Distance Matrix API returned error status: {}", status);
    }
    Ok(())
}

impl RouteMatrix for GoogleDistanceMatrix {
    fn submit(
        &self,
        origins: &[Point<f64>],
        destinations: &[Point<f64>],
    ) -> Result<Vec<PairOutcome>> {
        ensure!(
            origins.len() == destinations.len(),
            "origin and destination lists differ in length ({} vs {})",
            origins.len(),
            destinations.len()
        );

        let response = self.fetch(origins, destinations)?;
        response.check_status()?;
        response.diagonal(origins.len())
    }
}

/// Format points as the pipe-separated `lat,lng` list the API expects
fn format_locations(points: &[Point<f64>]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.y(), p.x()))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "destination_addresses": ["A", "B"],
        "origin_addresses": ["C", "D"],
        "rows": [
            {"elements": [
                {"status": "OK", "duration": {"value": 754, "text": "13 mins"}, "distance": {"value": 9012, "text": "9.0 km"}},
                {"status": "OK", "duration": {"value": 999, "text": "17 mins"}}
            ]},
            {"elements": [
                {"status": "OK", "duration": {"value": 321, "text": "5 mins"}},
                {"status": "ZERO_RESULTS"}
            ]}
        ],
        "status": "OK"
    }"#;

    #[test]
    fn test_format_locations() {
        let points = vec![Point::new(-74.9, 38.6), Point::new(-75.0, 38.55)];
        assert_eq!(format_locations(&points), "38.6,-74.9|38.55,-75");
    }

    fn client() -> GoogleDistanceMatrix {
        GoogleDistanceMatrix::new("secret", DISTANCE_MATRIX_URL, TravelMode::Driving, None).unwrap()
    }

    #[test]
    fn test_request_query_parameters() {
        let origins = vec![Point::new(-74.9, 38.6), Point::new(-74.95, 38.65)];
        let destinations = vec![Point::new(-75.0, 38.55), Point::new(-74.92, 38.7)];

        let request = client().build_request(&origins, &destinations).unwrap();
        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().path(), "/maps/api/distancematrix/json");

        let query: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let expected = [
            ("origins", "38.6,-74.9|38.65,-74.95"),
            ("destinations", "38.55,-75|38.7,-74.92"),
            ("mode", "driving"),
            ("units", "metric"),
            ("key", "secret"),
        ];
        assert_eq!(query.len(), expected.len());
        for (pair, (key, value)) in query.iter().zip(expected) {
            assert_eq!(pair.0, key);
            assert_eq!(pair.1, value);
        }
    }

    #[test]
    fn test_request_uses_configured_mode() {
        let matrix =
            GoogleDistanceMatrix::new("k", DISTANCE_MATRIX_URL, TravelMode::Walking, None).unwrap();
        let request = matrix
            .build_request(&[Point::new(0.0, 0.0)], &[Point::new(1.0, 1.0)])
            .unwrap();

        assert!(
            request
                .url()
                .query_pairs()
                .any(|(k, v)| k == "mode" && v == "walking")
        );
    }

    #[test]
    fn test_submit_rejects_unequal_lists() {
        let err = client()
            .submit(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)], &[Point::new(0.5, 0.5)])
            .unwrap_err();
        assert!(err.to_string().contains("differ in length"));
    }

    #[test]
    fn test_http_status_check() {
        assert!(check_http_status(reqwest::StatusCode::OK).is_ok());

        let err = check_http_status(reqwest::StatusCode::FORBIDDEN).unwrap_err();
        assert!(err.to_string().contains("403"));
        assert!(check_http_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).is_err());
    }

    #[test]
    fn test_parse_response_reads_diagonal() {
        let response: DistanceMatrixResponse = serde_json::from_str(SAMPLE).unwrap();
        response.check_status().unwrap();

        let outcomes = response.diagonal(2).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].duration(), Some(754));
        assert_eq!(outcomes[1].status, ElementStatus::ZeroResults);
        assert_eq!(outcomes[1].duration(), None);
    }

    #[test]
    fn test_diagonal_missing_cell_is_error() {
        let response: DistanceMatrixResponse = serde_json::from_str(SAMPLE).unwrap();
        assert!(response.diagonal(3).is_err());
    }

    #[test]
    fn test_request_denied_is_error() {
        let json = r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "rows": []}"#;
        let response: DistanceMatrixResponse = serde_json::from_str(json).unwrap();

        let err = response.check_status().unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
        assert!(err.to_string().contains("API key is invalid"));
    }

    #[test]
    fn test_unknown_element_status() {
        let json = r#"{"status": "OK", "rows": [{"elements": [{"status": "SOMETHING_NEW"}]}]}"#;
        let response: DistanceMatrixResponse = serde_json::from_str(json).unwrap();
        let outcomes = response.diagonal(1).unwrap();
        assert_eq!(outcomes[0], PairOutcome::failed(ElementStatus::Unknown));
    }

    #[test]
    fn test_travel_mode_names() {
        assert_eq!(TravelMode::default().as_str(), "driving");
        let mode: TravelMode = serde_json::from_str(r#""bicycling""#).unwrap();
        assert_eq!(mode, TravelMode::Bicycling);
    }
}
