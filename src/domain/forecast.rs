//! Demand forecaster.
//!
//! Sales are grouped by (store, product) into a chronological daily series and
//! each series is forecast independently. Groups are fitted in parallel; a
//! failed fit only affects its own group, which falls back to the mean rate.

use crate::domain::arima::Arima111;
use crate::domain::error::FitError;
use crate::domain::records::{ForecastEntry, ForecastTable, SalesRecord};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;

pub const DEFAULT_HORIZON_DAYS: usize = 7;
pub const MAX_HORIZON_DAYS: usize = 366;

/// A univariate model producing the total demand over the next `horizon` days.
pub trait DemandModel: Sync {
    fn forecast_total(&self, series: &[f64], horizon: usize) -> Result<f64, FitError>;
}

impl DemandModel for Arima111 {
    fn forecast_total(&self, series: &[f64], horizon: usize) -> Result<f64, FitError> {
        let fitted = self.fit(series)?;
        let total: f64 = fitted.forecast(horizon)?.into_iter().sum();
        if total.is_finite() {
            Ok(total)
        } else {
            Err(FitError::NonFinite)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastMethod {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastOutcome {
    pub entry: ForecastEntry,
    pub method: ForecastMethod,
}

/// Daily units per (store, product), summed per date in ascending date order.
pub fn daily_series(records: &[SalesRecord]) -> BTreeMap<(String, String), Vec<f64>> {
    let mut grouped: BTreeMap<(String, String), BTreeMap<NaiveDate, u64>> = BTreeMap::new();
    for r in records {
        *grouped
            .entry((r.store.clone(), r.product.clone()))
            .or_default()
            .entry(r.date)
            .or_default() += u64::from(r.units_sold);
    }

    grouped
        .into_iter()
        .map(|(key, days)| (key, days.into_values().map(|u| u as f64).collect()))
        .collect()
}

/// `round(mean * horizon)`. Total for any series, including an empty one.
pub fn fallback_demand(series: &[f64], horizon: usize) -> u32 {
    if series.is_empty() {
        return 0;
    }
    let mean = series.iter().sum::<f64>() / series.len() as f64;
    to_units(mean * horizon as f64)
}

/// Coerces a forecast to a non-negative whole number of units.
pub fn to_units(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round().min(u32::MAX as f64) as u32
}

pub fn forecast_series<M: DemandModel + ?Sized>(
    model: &M,
    series: &[f64],
    horizon: usize,
) -> (u32, ForecastMethod) {
    match model.forecast_total(series, horizon) {
        Ok(total) => (to_units(total), ForecastMethod::Model),
        Err(e) => {
            tracing::debug!(error = %e, observations = series.len(), "model fit failed, using mean fallback");
            (fallback_demand(series, horizon), ForecastMethod::Fallback)
        }
    }
}

/// Forecasts every (store, product) that has at least one sales record,
/// sorted by (store, product).
pub fn forecast_outcomes<M: DemandModel + ?Sized>(
    records: &[SalesRecord],
    model: &M,
    horizon: usize,
) -> Vec<ForecastOutcome> {
    let groups: Vec<_> = daily_series(records).into_iter().collect();

    groups
        .par_iter()
        .map(|((store, product), series)| {
            let (weekly_demand, method) = forecast_series(model, series, horizon);
            ForecastOutcome {
                entry: ForecastEntry {
                    store: store.clone(),
                    product: product.clone(),
                    weekly_demand,
                },
                method,
            }
        })
        .collect()
}

pub fn forecast_demand<M: DemandModel + ?Sized>(
    records: &[SalesRecord],
    model: &M,
    horizon: usize,
) -> ForecastTable {
    let outcomes = forecast_outcomes(records, model, horizon);
    let fallbacks = outcomes
        .iter()
        .filter(|o| o.method == ForecastMethod::Fallback)
        .count();
    tracing::info!(
        groups = outcomes.len(),
        fallbacks,
        horizon,
        "demand forecast complete"
    );
    outcomes.into_iter().map(|o| o.entry).collect()
}
