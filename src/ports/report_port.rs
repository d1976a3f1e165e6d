//! Output port for the tables a pass produces.

use crate::domain::error::StockshiftError;
use crate::domain::plan::RebalancePlan;
use crate::domain::records::{ForecastTable, GapEntry, InventorySnapshot, TransferRecommendation};

pub trait ReportPort {
    fn write_forecasts(&self, forecasts: &ForecastTable) -> Result<(), StockshiftError>;

    fn write_gaps(&self, gaps: &[GapEntry]) -> Result<(), StockshiftError>;

    fn write_transfers(&self, transfers: &[TransferRecommendation]) -> Result<(), StockshiftError>;

    fn write_inventory(&self, inventory: &InventorySnapshot) -> Result<(), StockshiftError>;

    /// Default implementation: writes the three pipeline tables in flow order.
    fn write_plan(&self, plan: &RebalancePlan) -> Result<(), StockshiftError> {
        self.write_forecasts(&plan.forecasts)?;
        self.write_gaps(&plan.gaps)?;
        self.write_transfers(&plan.transfers)
    }
}
