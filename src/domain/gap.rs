//! Gap calculator: inner join of current stock against forecast demand.

use crate::domain::records::{ForecastTable, GapEntry, InventorySnapshot};

/// `gap = units_in_stock - weekly_demand` for every pair present in both
/// inputs, in snapshot order. Pairs missing from either side are dropped.
pub fn compute_gaps(inventory: &InventorySnapshot, forecasts: &ForecastTable) -> Vec<GapEntry> {
    inventory
        .entries()
        .iter()
        .filter_map(|item| {
            let demand = forecasts.weekly_demand(&item.store, &item.product)?;
            Some(GapEntry {
                store: item.store.clone(),
                product: item.product.clone(),
                gap: i64::from(item.units_in_stock) - i64::from(demand),
            })
        })
        .collect()
}
