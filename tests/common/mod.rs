#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use stockshift::domain::error::StockshiftError;
use stockshift::domain::records::{
    ForecastTable, GapEntry, InventorySnapshot, SalesRecord, TransferRecommendation,
};
use stockshift::ports::data_port::DataPort;
use stockshift::ports::report_port::ReportPort;

pub struct MockDataPort {
    pub sales: Vec<SalesRecord>,
    pub inventory: InventorySnapshot,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            sales: Vec::new(),
            inventory: InventorySnapshot::new(),
            error: None,
        }
    }

    pub fn with_sales(mut self, sales: Vec<SalesRecord>) -> Self {
        self.sales.extend(sales);
        self
    }

    pub fn with_stock(mut self, store: &str, product: &str, units: u32) -> Self {
        self.inventory.insert(store, product, units);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_sales(&self) -> Result<Vec<SalesRecord>, StockshiftError> {
        if let Some(reason) = &self.error {
            return Err(StockshiftError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.sales.clone())
    }

    fn fetch_inventory(&self) -> Result<InventorySnapshot, StockshiftError> {
        if let Some(reason) = &self.error {
            return Err(StockshiftError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.inventory.clone())
    }
}

/// Captures every table written to it.
#[derive(Default)]
pub struct RecordingReportPort {
    pub forecasts: RefCell<Option<ForecastTable>>,
    pub gaps: RefCell<Option<Vec<GapEntry>>>,
    pub transfers: RefCell<Option<Vec<TransferRecommendation>>>,
    pub inventory: RefCell<Option<InventorySnapshot>>,
}

impl ReportPort for RecordingReportPort {
    fn write_forecasts(&self, forecasts: &ForecastTable) -> Result<(), StockshiftError> {
        *self.forecasts.borrow_mut() = Some(forecasts.clone());
        Ok(())
    }

    fn write_gaps(&self, gaps: &[GapEntry]) -> Result<(), StockshiftError> {
        *self.gaps.borrow_mut() = Some(gaps.to_vec());
        Ok(())
    }

    fn write_transfers(&self, transfers: &[TransferRecommendation]) -> Result<(), StockshiftError> {
        *self.transfers.borrow_mut() = Some(transfers.to_vec());
        Ok(())
    }

    fn write_inventory(&self, inventory: &InventorySnapshot) -> Result<(), StockshiftError> {
        *self.inventory.borrow_mut() = Some(inventory.clone());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn gap(store: &str, product: &str, gap: i64) -> GapEntry {
    GapEntry {
        store: store.to_string(),
        product: product.to_string(),
        gap,
    }
}

/// `days` consecutive days of constant sales starting 2024-01-01.
pub fn constant_sales(store: &str, product: &str, units: u32, days: u32) -> Vec<SalesRecord> {
    generate_sales(store, product, days, |_| units)
}

pub fn generate_sales(
    store: &str,
    product: &str,
    days: u32,
    units: impl Fn(u32) -> u32,
) -> Vec<SalesRecord> {
    let start = date(2024, 1, 1);
    (0..days)
        .map(|i| SalesRecord {
            date: start + chrono::Duration::days(i as i64),
            store: store.to_string(),
            product: product.to_string(),
            units_sold: units(i),
        })
        .collect()
}
