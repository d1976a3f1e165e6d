//! Data access port trait.

use crate::domain::error::StockshiftError;
use crate::domain::records::{InventorySnapshot, SalesRecord};

/// Source of the two validated input tables. Implementations reject
/// malformed rows before they reach the domain.
pub trait DataPort {
    fn fetch_sales(&self) -> Result<Vec<SalesRecord>, StockshiftError>;

    fn fetch_inventory(&self) -> Result<InventorySnapshot, StockshiftError>;
}
