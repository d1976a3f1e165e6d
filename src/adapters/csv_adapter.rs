//! CSV file data and report adapter.
//!
//! Reads `date,store,product,units_sold` sales rows and
//! `store,product,units_in_stock` inventory rows; writes the forecast, gap and
//! transfer tables into an output directory.

use crate::domain::error::StockshiftError;
use crate::domain::records::{
    ForecastTable, GapEntry, InventorySnapshot, SalesRecord, TransferRecommendation,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const FORECAST_FILE: &str = "forecast.csv";
pub const GAP_FILE: &str = "gap_analysis.csv";
pub const TRANSFER_FILE: &str = "transfer_plan.csv";

pub const FORECAST_HEADER: [&str; 3] = ["store", "product", "weekly_demand"];
pub const GAP_HEADER: [&str; 3] = ["store", "product", "gap"];
pub const TRANSFER_HEADER: [&str; 5] = ["from_store", "to_store", "product", "quantity", "reason"];
pub const INVENTORY_HEADER: [&str; 3] = ["store", "product", "units_in_stock"];

#[derive(Debug, Deserialize)]
struct SalesRow {
    date: String,
    store: String,
    #[serde(alias = "product_id", alias = "product_name")]
    product: String,
    units_sold: String,
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    store: String,
    #[serde(alias = "product_id", alias = "product_name")]
    product: String,
    units_in_stock: String,
}

pub struct CsvAdapter {
    sales_path: PathBuf,
    inventory_path: PathBuf,
    output_dir: PathBuf,
}

impl CsvAdapter {
    pub fn new(sales_path: PathBuf, inventory_path: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            sales_path,
            inventory_path,
            output_dir,
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockshiftError> {
        let required = |key: &str| {
            config
                .get_string("data", key)
                .ok_or_else(|| StockshiftError::ConfigMissing {
                    section: "data".into(),
                    key: key.into(),
                })
        };
        let sales_path = required("sales_path")?;
        let inventory_path = required("inventory_path")?;
        let output_dir = config
            .get_string("data", "output_dir")
            .unwrap_or_else(|| ".".to_string());

        Ok(Self::new(
            PathBuf::from(sales_path),
            PathBuf::from(inventory_path),
            PathBuf::from(output_dir),
        ))
    }

    /// Overrides the output directory, e.g. from a command-line flag.
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    fn open(path: &Path) -> Result<fs::File, StockshiftError> {
        fs::File::open(path).map_err(|e| StockshiftError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }

    fn write_table<T: Serialize>(
        &self,
        file: &str,
        header: &[&str],
        rows: &[T],
    ) -> Result<(), StockshiftError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path(file);
        let out = fs::File::create(&path).map_err(|e| StockshiftError::DataSource {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;
        write_rows(out, header, rows)?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "table written");
        Ok(())
    }
}

impl DataPort for CsvAdapter {
    fn fetch_sales(&self) -> Result<Vec<SalesRecord>, StockshiftError> {
        read_sales(Self::open(&self.sales_path)?)
    }

    fn fetch_inventory(&self) -> Result<InventorySnapshot, StockshiftError> {
        read_inventory(Self::open(&self.inventory_path)?)
    }
}

impl ReportPort for CsvAdapter {
    fn write_forecasts(&self, forecasts: &ForecastTable) -> Result<(), StockshiftError> {
        self.write_table(FORECAST_FILE, &FORECAST_HEADER, forecasts.entries())
    }

    fn write_gaps(&self, gaps: &[GapEntry]) -> Result<(), StockshiftError> {
        self.write_table(GAP_FILE, &GAP_HEADER, gaps)
    }

    fn write_transfers(&self, transfers: &[TransferRecommendation]) -> Result<(), StockshiftError> {
        self.write_table(TRANSFER_FILE, &TRANSFER_HEADER, transfers)
    }

    /// Rewrites the inventory file through a sibling temp file, so a failed
    /// write leaves the previous contents in place.
    fn write_inventory(&self, inventory: &InventorySnapshot) -> Result<(), StockshiftError> {
        let target = &self.inventory_path;
        let mut staging = target.as_os_str().to_owned();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        let write_failed = |e: &dyn std::fmt::Display| StockshiftError::DataSource {
            reason: format!("failed to write {}: {}", target.display(), e),
        };
        let out = fs::File::create(&staging).map_err(|e| write_failed(&e))?;
        if let Err(e) = write_rows(out, &INVENTORY_HEADER, inventory.entries()) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        fs::rename(&staging, target).map_err(|e| {
            let _ = fs::remove_file(&staging);
            write_failed(&e)
        })
    }
}

/// Header is line 1, so the first data row is line 2.
fn line_of(index: usize) -> usize {
    index + 2
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate, StockshiftError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| StockshiftError::InvalidRecord {
            row,
            reason: format!("invalid date '{}' (expected YYYY-MM-DD)", value),
        })
}

/// Whole non-negative unit count. Fractional values (averaged snapshots) are
/// rounded to the nearest unit.
fn parse_units(value: &str, column: &str, row: usize) -> Result<u32, StockshiftError> {
    let value = value.trim();
    if let Ok(units) = value.parse::<u32>() {
        return Ok(units);
    }

    let invalid = |reason: String| StockshiftError::InvalidRecord { row, reason };
    let parsed: f64 = value
        .parse()
        .map_err(|_| invalid(format!("invalid {} value '{}'", column, value)))?;
    if !parsed.is_finite() {
        return Err(invalid(format!("invalid {} value '{}'", column, value)));
    }
    if parsed < 0.0 {
        return Err(invalid(format!("{} must be non-negative, got {}", column, value)));
    }
    if parsed > u32::MAX as f64 {
        return Err(invalid(format!("{} value {} is too large", column, value)));
    }
    Ok(parsed.round() as u32)
}

fn non_empty(value: String, column: &str, row: usize) -> Result<String, StockshiftError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StockshiftError::InvalidRecord {
            row,
            reason: format!("empty {} column", column),
        });
    }
    Ok(trimmed.to_string())
}

pub fn read_sales<R: io::Read>(reader: R) -> Result<Vec<SalesRecord>, StockshiftError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (i, result) in rdr.deserialize::<SalesRow>().enumerate() {
        let row = line_of(i);
        let raw = result.map_err(|e| StockshiftError::InvalidRecord {
            row,
            reason: format!("CSV parse error: {}", e),
        })?;

        records.push(SalesRecord {
            date: parse_date(&raw.date, row)?,
            store: non_empty(raw.store, "store", row)?,
            product: non_empty(raw.product, "product", row)?,
            units_sold: parse_units(&raw.units_sold, "units_sold", row)?,
        });
    }

    Ok(records)
}

pub fn read_inventory<R: io::Read>(reader: R) -> Result<InventorySnapshot, StockshiftError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut snapshot = InventorySnapshot::new();

    for (i, result) in rdr.deserialize::<InventoryRow>().enumerate() {
        let row = line_of(i);
        let raw = result.map_err(|e| StockshiftError::InvalidRecord {
            row,
            reason: format!("CSV parse error: {}", e),
        })?;

        let store = non_empty(raw.store, "store", row)?;
        let product = non_empty(raw.product, "product", row)?;
        if snapshot.get(&store, &product).is_some() {
            return Err(StockshiftError::InvalidRecord {
                row,
                reason: format!("duplicate inventory row for {} / {}", store, product),
            });
        }
        let units = parse_units(&raw.units_in_stock, "units_in_stock", row)?;
        snapshot.insert(&store, &product, units);
    }

    Ok(snapshot)
}

/// Writes `header` followed by one record per row. The header is written
/// explicitly so an empty table still carries its column names.
pub fn write_rows<W: io::Write, T: Serialize>(
    writer: W,
    header: &[&str],
    rows: &[T],
) -> Result<(), StockshiftError> {
    let write_error = |e: csv::Error| StockshiftError::DataSource {
        reason: format!("CSV write error: {}", e),
    };
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(header).map_err(write_error)?;
    for row in rows {
        wtr.serialize(row).map_err(write_error)?;
    }
    wtr.flush()?;
    Ok(())
}
