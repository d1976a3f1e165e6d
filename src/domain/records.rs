//! Tabular records exchanged between pipeline stages.
//!
//! Column names on every struct match the CSV headers downstream consumers
//! read, so the serde field names are load-bearing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One day of sales for a (store, product) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub store: String,
    pub product: String,
    pub units_sold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub store: String,
    pub product: String,
    pub units_in_stock: u32,
}

/// Current stock per (store, product), iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    entries: Vec<InventoryEntry>,
    index: HashMap<(String, String), usize>,
}

impl InventorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stock for a pair. An existing pair keeps its position.
    pub fn insert(&mut self, store: &str, product: &str, units_in_stock: u32) {
        let key = (store.to_string(), product.to_string());
        match self.index.get(&key) {
            Some(&i) => self.entries[i].units_in_stock = units_in_stock,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(InventoryEntry {
                    store: store.to_string(),
                    product: product.to_string(),
                    units_in_stock,
                });
            }
        }
    }

    pub fn get(&self, store: &str, product: &str) -> Option<u32> {
        self.index
            .get(&(store.to_string(), product.to_string()))
            .map(|&i| self.entries[i].units_in_stock)
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<InventoryEntry> for InventorySnapshot {
    fn from_iter<T: IntoIterator<Item = InventoryEntry>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for entry in iter {
            snapshot.insert(&entry.store, &entry.product, entry.units_in_stock);
        }
        snapshot
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub store: String,
    pub product: String,
    pub weekly_demand: u32,
}

/// Forecasts for one pass, at most one per (store, product).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastTable {
    entries: Vec<ForecastEntry>,
    index: HashMap<(String, String), usize>,
}

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the forecast for a pair.
    pub fn insert(&mut self, entry: ForecastEntry) {
        let key = (entry.store.clone(), entry.product.clone());
        match self.index.get(&key) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn weekly_demand(&self, store: &str, product: &str) -> Option<u32> {
        self.index
            .get(&(store.to_string(), product.to_string()))
            .map(|&i| self.entries[i].weekly_demand)
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ForecastEntry> for ForecastTable {
    fn from_iter<T: IntoIterator<Item = ForecastEntry>>(iter: T) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

/// Signed stock-minus-demand. Positive is surplus, negative is shortage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEntry {
    pub store: String,
    pub product: String,
    pub gap: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecommendation {
    pub from_store: String,
    pub to_store: String,
    pub product: String,
    pub quantity: u32,
    pub reason: String,
}
