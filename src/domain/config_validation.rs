//! Configuration validation.
//!
//! Validates every tunable before a pass runs. Missing keys fall back to their
//! defaults; present keys must be in range.

use crate::domain::arima::{DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_OBSERVATIONS};
use crate::domain::error::StockshiftError;
use crate::domain::forecast::{DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS};
use crate::domain::live::{DEFAULT_LOW_THRESHOLD, DEFAULT_MOVE_QTY};
use crate::domain::matcher::{DEFAULT_SHORTAGE_THRESHOLD, DEFAULT_SURPLUS_THRESHOLD};
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StockshiftError> {
    validate_data_paths(config)?;
    validate_forecast(config)?;
    validate_thresholds(config)?;
    validate_live(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> StockshiftError {
    StockshiftError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Reads an integer setting, falling back to `default` only when the key is
/// absent. A value that is present but unparsable is `ConfigInvalid`.
pub fn int_or_default(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, StockshiftError> {
    config
        .get_int(section, key)
        .map(|value| value.unwrap_or(default))
        .map_err(|reason| invalid(section, key, &reason))
}

fn validate_data_paths(config: &dyn ConfigPort) -> Result<(), StockshiftError> {
    for key in ["sales_path", "inventory_path", "output_dir"] {
        if let Some(value) = config.get_string("data", key) {
            if value.trim().is_empty() {
                return Err(invalid("data", key, "path must not be empty"));
            }
        }
    }
    Ok(())
}

fn validate_forecast(config: &dyn ConfigPort) -> Result<(), StockshiftError> {
    let horizon = int_or_default(config, "forecast", "horizon_days", DEFAULT_HORIZON_DAYS as i64)?;
    if horizon < 1 || horizon > MAX_HORIZON_DAYS as i64 {
        return Err(invalid(
            "forecast",
            "horizon_days",
            &format!("horizon_days must be between 1 and {}", MAX_HORIZON_DAYS),
        ));
    }
    let min_observations = int_or_default(
        config,
        "forecast",
        "min_observations",
        DEFAULT_MIN_OBSERVATIONS as i64,
    )?;
    if min_observations < 3 {
        return Err(invalid(
            "forecast",
            "min_observations",
            "min_observations must be at least 3",
        ));
    }
    if int_or_default(config, "forecast", "max_iterations", DEFAULT_MAX_ITERATIONS as i64)? < 1 {
        return Err(invalid(
            "forecast",
            "max_iterations",
            "max_iterations must be at least 1",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), StockshiftError> {
    let surplus = int_or_default(config, "matcher", "surplus_threshold", DEFAULT_SURPLUS_THRESHOLD)?;
    let shortage =
        int_or_default(config, "matcher", "shortage_threshold", DEFAULT_SHORTAGE_THRESHOLD)?;

    if surplus < 0 {
        return Err(invalid(
            "matcher",
            "surplus_threshold",
            "surplus_threshold must be non-negative",
        ));
    }
    if shortage > 0 {
        return Err(invalid(
            "matcher",
            "shortage_threshold",
            "shortage_threshold must be zero or negative",
        ));
    }
    Ok(())
}

fn validate_live(config: &dyn ConfigPort) -> Result<(), StockshiftError> {
    let low = int_or_default(config, "live", "low_threshold", i64::from(DEFAULT_LOW_THRESHOLD))?;
    if low < 1 || low > i64::from(u32::MAX / 2) {
        return Err(invalid(
            "live",
            "low_threshold",
            "low_threshold must be a positive whole number",
        ));
    }
    let move_qty = int_or_default(config, "live", "move_qty", i64::from(DEFAULT_MOVE_QTY))?;
    if move_qty < 1 || move_qty > i64::from(u32::MAX) {
        return Err(invalid(
            "live",
            "move_qty",
            "move_qty must be a positive whole number",
        ));
    }
    Ok(())
}
