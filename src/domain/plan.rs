//! One batch pass of the rebalancing pipeline.
//!
//! sales history -> forecast table -> gap table -> transfer plan

use crate::domain::arima::Arima111;
use crate::domain::forecast::{forecast_demand, DemandModel, DEFAULT_HORIZON_DAYS};
use crate::domain::gap::compute_gaps;
use crate::domain::matcher::{match_transfers, MatcherConfig};
use crate::domain::records::{
    ForecastTable, GapEntry, InventorySnapshot, SalesRecord, TransferRecommendation,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanConfig {
    pub horizon_days: usize,
    pub model: Arima111,
    pub matcher: MatcherConfig,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            model: Arima111::default(),
            matcher: MatcherConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RebalancePlan {
    pub forecasts: ForecastTable,
    pub gaps: Vec<GapEntry>,
    pub transfers: Vec<TransferRecommendation>,
}

impl RebalancePlan {
    pub fn units_moved(&self) -> u64 {
        self.transfers.iter().map(|t| u64::from(t.quantity)).sum()
    }

    pub fn shortage_count(&self, config: &MatcherConfig) -> usize {
        self.gaps
            .iter()
            .filter(|g| g.gap < config.shortage_threshold)
            .count()
    }

    pub fn surplus_count(&self, config: &MatcherConfig) -> usize {
        self.gaps
            .iter()
            .filter(|g| g.gap > config.surplus_threshold)
            .count()
    }
}

pub fn build_plan(
    sales: &[SalesRecord],
    inventory: &InventorySnapshot,
    config: &PlanConfig,
) -> RebalancePlan {
    build_plan_with(sales, inventory, &config.model, config.horizon_days, &config.matcher)
}

/// Same as [`build_plan`] with a caller-supplied demand model.
pub fn build_plan_with<M: DemandModel + ?Sized>(
    sales: &[SalesRecord],
    inventory: &InventorySnapshot,
    model: &M,
    horizon_days: usize,
    matcher: &MatcherConfig,
) -> RebalancePlan {
    let forecasts = forecast_demand(sales, model, horizon_days);
    let gaps = compute_gaps(inventory, &forecasts);
    let transfers = match_transfers(&gaps, matcher);

    tracing::info!(
        forecasts = forecasts.len(),
        gaps = gaps.len(),
        transfers = transfers.len(),
        "rebalance plan built"
    );

    RebalancePlan {
        forecasts,
        gaps,
        transfers,
    }
}
