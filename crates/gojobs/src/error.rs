use crate::config::ConfigError;
use crate::marketplace::{MarketplaceServiceError, SnapshotError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Snapshot(SnapshotError),
    Marketplace(MarketplaceServiceError),
    Output(serde_json::Error),
    MissingSnapshot,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Snapshot(err) => write!(f, "snapshot error: {}", err),
            AppError::Marketplace(err) => write!(f, "marketplace error: {}", err),
            AppError::Output(err) => write!(f, "failed to render output: {}", err),
            AppError::MissingSnapshot => write!(
                f,
                "no marketplace snapshot configured (set GOJOBS_SNAPSHOT or pass --snapshot)"
            ),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Snapshot(err) => Some(err),
            AppError::Marketplace(err) => Some(err),
            AppError::Output(err) => Some(err),
            AppError::MissingSnapshot => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<SnapshotError> for AppError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

impl From<MarketplaceServiceError> for AppError {
    fn from(value: MarketplaceServiceError) -> Self {
        Self::Marketplace(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}
