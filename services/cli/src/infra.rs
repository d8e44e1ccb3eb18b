use chrono::NaiveDate;
use kitsusa::config::AppConfig;
use kitsusa::error::AppError;
use kitsusa::evaluation::{
    EngineOptions, EvaluationEngine, EvaluationRequest, FactorKind, MatrixSet, StandardsCatalog,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_factor(raw: &str) -> Result<FactorKind, String> {
    raw.parse()
}

pub(crate) fn parse_hours(raw: &str) -> Result<f64, String> {
    let hours: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as hours ({err})"))?;
    if hours.is_finite() && hours >= 0.0 {
        Ok(hours)
    } else {
        Err(format!("hours must be a non-negative number (got {raw})"))
    }
}

/// Standards from `KITSUSA_STANDARDS_PATH`, or the embedded catalog.
pub(crate) fn load_catalog(config: &AppConfig) -> Result<StandardsCatalog, AppError> {
    let catalog = match &config.data.standards_path {
        Some(path) => {
            debug!(path = %path.display(), "loading standards from file");
            StandardsCatalog::from_path(path)?
        }
        None => StandardsCatalog::embedded()?,
    };
    Ok(catalog)
}

fn load_matrices(config: &AppConfig) -> Result<MatrixSet, AppError> {
    let matrices = match &config.data.matrices_path {
        Some(path) => {
            debug!(path = %path.display(), "loading matrices from file");
            MatrixSet::from_path(path)?
        }
        None => MatrixSet::embedded()?,
    };
    Ok(matrices)
}

/// Engine over the configured reference data. `as_of` overrides the
/// configured standards date.
pub(crate) fn load_engine(
    config: &AppConfig,
    as_of: Option<NaiveDate>,
    options: EngineOptions,
) -> Result<EvaluationEngine, AppError> {
    let catalog = load_catalog(config)?;
    let standards = catalog.select(as_of.or(config.scoring.standards_as_of))?;
    let matrices = load_matrices(config)?;
    Ok(EvaluationEngine::new(standards, Arc::new(matrices), options))
}

pub(crate) fn read_request(path: &Path) -> Result<EvaluationRequest, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_values() {
        assert_eq!(
            parse_date(" 2024-08-20 "),
            Ok(NaiveDate::from_ymd_opt(2024, 8, 20).expect("valid date"))
        );
        assert!(parse_date("20.08.2024").is_err());

        assert_eq!(parse_factor("danger"), Ok(FactorKind::Hazard));
        assert!(parse_factor("noise").is_err());

        assert_eq!(parse_hours("7.5"), Ok(7.5));
        assert!(parse_hours("-1").is_err());
        assert!(parse_hours("eight").is_err());
    }
}
