use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Coordinate, LocationFix, SensorFailure};

/// Errors reported by a location sensor
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
}

impl SensorError {
    fn failure(&self) -> SensorFailure {
        match self {
            SensorError::PermissionDenied => SensorFailure::PermissionDenied,
            SensorError::PositionUnavailable(_) => SensorFailure::PositionUnavailable,
        }
    }
}

/// The device/platform position capability behind the provider
///
/// Single-shot request, no continuous tracking. Production uses the IP
/// geolocation sensor; tests plug in stubs.
#[async_trait]
pub trait LocationSensor: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, SensorError>;
}

/// Asynchronous wrapper over the location sensor
///
/// `acquire` is the subsystem's only suspension point. It never returns a
/// hard failure: permission denial, timeout and position errors all collapse
/// into `LocationFix::Unavailable` so the caller degrades to distance-less
/// matching.
pub struct LocationProvider {
    sensor: Arc<dyn LocationSensor>,
    timeout: Duration,
}

impl LocationProvider {
    pub fn new(sensor: Arc<dyn LocationSensor>, timeout: Duration) -> Self {
        Self { sensor, timeout }
    }

    /// One acquisition attempt; no retry
    pub async fn acquire(&self) -> LocationFix {
        match tokio::time::timeout(self.timeout, self.sensor.current_position()).await {
            Ok(Ok(position)) => {
                tracing::debug!(
                    "Location resolved: {:.4}, {:.4}",
                    position.latitude,
                    position.longitude
                );
                LocationFix::Resolved(position)
            }
            Ok(Err(e)) => {
                tracing::warn!("Location sensor failed: {}", e);
                LocationFix::Unavailable(e.failure())
            }
            Err(_) => {
                tracing::warn!("Location acquisition timed out after {:?}", self.timeout);
                LocationFix::Unavailable(SensorFailure::Timeout)
            }
        }
    }
}

/// Coarse position lookup against an ip-api style endpoint
pub struct IpGeolocationSensor {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct IpApiPosition {
    #[serde(default)]
    status: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpGeolocationSensor {
    pub fn new(endpoint: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, endpoint }
    }
}

#[async_trait]
impl LocationSensor for IpGeolocationSensor {
    async fn current_position(&self) -> Result<Coordinate, SensorError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| SensorError::PositionUnavailable(e.to_string()))?;

        if response.status() == StatusCode::FORBIDDEN || response.status() == StatusCode::UNAUTHORIZED
        {
            return Err(SensorError::PermissionDenied);
        }
        if !response.status().is_success() {
            return Err(SensorError::PositionUnavailable(format!(
                "endpoint returned {}",
                response.status()
            )));
        }

        let position: IpApiPosition = response
            .json()
            .await
            .map_err(|e| SensorError::PositionUnavailable(e.to_string()))?;

        if position.status == "fail" {
            return Err(SensorError::PositionUnavailable(
                "lookup reported failure".to_string(),
            ));
        }

        match (position.lat, position.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinate::new(latitude, longitude)),
            _ => Err(SensorError::PositionUnavailable(
                "response missing coordinates".to_string(),
            )),
        }
    }
}
