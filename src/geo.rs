use futures::future::BoxFuture;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Why a location fix could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("Please allow location access.")]
    PermissionDenied,
    #[error("Location information unavailable.")]
    PositionUnavailable,
    #[error("Location request timed out.")]
    Timeout,
    #[error("Unknown error occurred.")]
    Unknown,
    #[error("Geolocation is not supported.")]
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One-shot position lookup.
pub trait Locator {
    fn current_position(&self) -> BoxFuture<'_, Result<Coordinates, GeoError>>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Resolves the machine's approximate position from its public IP.
pub struct IpLocator {
    client: Client,
    endpoint: String,
}

impl IpLocator {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("resq/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                warn!("Failed to create HTTP client: {}", e);
                GeoError::Unsupported
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    async fn lookup(&self) -> Result<Coordinates, GeoError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(classify_request_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GeoError::PermissionDenied);
            }
            status if !status.is_success() => {
                warn!("Location lookup returned HTTP {}", status);
                return Err(GeoError::PositionUnavailable);
            }
            _ => {}
        }

        let body: IpApiResponse = response.json().await.map_err(classify_request_error)?;
        debug!("Location lookup response: {:?}", body);
        coordinates_from(body)
    }
}

impl Locator for IpLocator {
    fn current_position(&self) -> BoxFuture<'_, Result<Coordinates, GeoError>> {
        Box::pin(self.lookup())
    }
}

fn classify_request_error(e: reqwest::Error) -> GeoError {
    if e.is_timeout() {
        GeoError::Timeout
    } else if e.is_decode() {
        GeoError::PositionUnavailable
    } else {
        warn!("Location lookup failed: {}", e);
        GeoError::Unknown
    }
}

fn coordinates_from(body: IpApiResponse) -> Result<Coordinates, GeoError> {
    if body.status != "success" {
        warn!(
            "Location lookup failed: {}",
            body.message.as_deref().unwrap_or("no reason given")
        );
        return Err(GeoError::PositionUnavailable);
    }
    match (body.lat, body.lon) {
        (Some(latitude), Some(longitude)) => Ok(Coordinates {
            latitude,
            longitude,
        }),
        _ => Err(GeoError::PositionUnavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body() {
        let body: IpApiResponse =
            serde_json::from_str(r#"{"status":"success","lat":19.076,"lon":72.8777}"#).unwrap();
        assert_eq!(
            coordinates_from(body),
            Ok(Coordinates {
                latitude: 19.076,
                longitude: 72.8777
            })
        );
    }

    #[test]
    fn test_fail_body_is_unavailable() {
        let body: IpApiResponse =
            serde_json::from_str(r#"{"status":"fail","message":"private range"}"#).unwrap();
        assert_eq!(coordinates_from(body), Err(GeoError::PositionUnavailable));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GeoError::PermissionDenied.to_string(),
            "Please allow location access."
        );
        assert_eq!(GeoError::Timeout.to_string(), "Location request timed out.");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_failure() {
        let locator = IpLocator::new("http://127.0.0.1:9/json", Duration::from_millis(500)).unwrap();
        assert!(locator.current_position().await.is_err());
    }
}
