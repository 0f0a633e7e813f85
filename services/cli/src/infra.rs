use crate::cli::SourceArgs;
use chrono::{DateTime, NaiveDate, Utc};
use gojobs::config::AppConfig;
use gojobs::error::AppError;
use gojobs::marketplace::{ContractType, MarketplaceService, MarketplaceSnapshot};
use std::sync::Arc;
use tracing::info;

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}

pub(crate) fn parse_contract_type(raw: &str) -> Result<ContractType, String> {
    ContractType::parse(raw)
        .ok_or_else(|| format!("unknown contract type '{raw}' (expected CDI, CDD, Freelance or Alternance)"))
}

/// Resolve the snapshot from `--snapshot` or `GOJOBS_SNAPSHOT`, then merge `--jobs-csv`.
///
/// A CSV export on its own is enough to query jobs; users and applications are then empty.
pub(crate) fn load_snapshot(
    config: &AppConfig,
    source: SourceArgs,
) -> Result<MarketplaceSnapshot, AppError> {
    let SourceArgs { snapshot, jobs_csv } = source;

    let mut loaded = match snapshot.or_else(|| config.snapshot_path.clone()) {
        Some(path) => MarketplaceSnapshot::from_path(&path)?,
        None if jobs_csv.is_some() => MarketplaceSnapshot::default(),
        None => return Err(AppError::MissingSnapshot),
    };

    if let Some(path) = jobs_csv {
        let imported = loaded.merge_jobs_csv_path(&path)?;
        info!(path = %path.display(), imported, "merged jobs CSV export");
    }

    Ok(loaded)
}

pub(crate) fn build_service(
    config: &AppConfig,
    snapshot: MarketplaceSnapshot,
) -> MarketplaceService<MarketplaceSnapshot> {
    MarketplaceService::new(Arc::new(snapshot), config.matching.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gojobs::config::{AppEnvironment, LogFormat, TelemetryConfig};
    use gojobs::marketplace::MatchingConfig;

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            telemetry: TelemetryConfig {
                log_level: "warn".to_string(),
                format: LogFormat::Compact,
            },
            matching: MatchingConfig::default(),
            snapshot_path: None,
        }
    }

    #[test]
    fn parses_rfc3339_and_plain_dates() {
        let expected = Utc
            .with_ymd_and_hms(2025, 5, 20, 0, 0, 0)
            .single()
            .expect("valid instant");
        assert_eq!(parse_datetime("2025-05-20").expect("date parses"), expected);
        assert_eq!(
            parse_datetime("2025-05-20T02:00:00+02:00").expect("timestamp parses"),
            expected
        );
        assert!(parse_datetime("20/05/2025").is_err());
    }

    #[test]
    fn contract_types_are_case_insensitive() {
        assert_eq!(parse_contract_type("cdd"), Ok(ContractType::Cdd));
        assert!(parse_contract_type("interim").is_err());
    }

    #[test]
    fn missing_snapshot_is_reported() {
        match load_snapshot(&config(), SourceArgs::default()) {
            Err(AppError::MissingSnapshot) => {}
            other => panic!("expected missing snapshot, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_snapshot_surfaces_io_error() {
        let source = SourceArgs {
            snapshot: Some("/nonexistent/gojobs/snapshot.json".into()),
            jobs_csv: None,
        };
        assert!(matches!(
            load_snapshot(&config(), source),
            Err(AppError::Snapshot(gojobs::marketplace::SnapshotError::Io(_)))
        ));
    }
}
