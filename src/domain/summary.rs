//! Inventory dashboard metrics.

use crate::domain::records::InventorySnapshot;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLine {
    pub product: String,
    pub units_in_stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSummary {
    pub store: String,
    pub total_stock: u64,
    pub products: Vec<ProductLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_stock: u64,
    pub low_stock_count: usize,
    /// Stores in order of first appearance.
    pub stores: Vec<StoreSummary>,
}

impl InventorySummary {
    pub fn compute(inventory: &InventorySnapshot, low_threshold: u32) -> Self {
        let mut products = HashSet::new();
        let mut stores: Vec<StoreSummary> = Vec::new();
        let mut total_stock = 0u64;
        let mut low_stock_count = 0usize;

        for entry in inventory.entries() {
            products.insert(entry.product.as_str());
            total_stock += u64::from(entry.units_in_stock);
            if entry.units_in_stock < low_threshold {
                low_stock_count += 1;
            }

            let line = ProductLine {
                product: entry.product.clone(),
                units_in_stock: entry.units_in_stock,
            };
            match stores.iter_mut().find(|s| s.store == entry.store) {
                Some(store) => {
                    store.total_stock += u64::from(entry.units_in_stock);
                    store.products.push(line);
                }
                None => stores.push(StoreSummary {
                    store: entry.store.clone(),
                    total_stock: u64::from(entry.units_in_stock),
                    products: vec![line],
                }),
            }
        }

        Self {
            total_products: products.len(),
            total_stock,
            low_stock_count,
            stores,
        }
    }
}
