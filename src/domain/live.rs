//! Forecast-free transfer suggestions from current stock levels.

use crate::domain::records::{InventoryEntry, InventorySnapshot, TransferRecommendation};

pub const DEFAULT_LOW_THRESHOLD: u32 = 50;
pub const DEFAULT_MOVE_QTY: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveConfig {
    /// Stock strictly below this is low; strictly above twice this is high.
    pub low_threshold: u32,
    /// Upper bound on a single suggested move.
    pub move_qty: u32,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            move_qty: DEFAULT_MOVE_QTY,
        }
    }
}

/// For each low-stock entry, suggests a move from the first high-stock store
/// holding the same product. Products are visited in order of first
/// appearance, low entries in snapshot order.
pub fn recommend_transfers(
    inventory: &InventorySnapshot,
    config: &LiveConfig,
) -> Vec<TransferRecommendation> {
    let high_threshold = u64::from(config.low_threshold) * 2;
    let mut products: Vec<&str> = Vec::new();
    for entry in inventory.entries() {
        if !products.contains(&entry.product.as_str()) {
            products.push(&entry.product);
        }
    }

    let mut suggestions = Vec::new();

    for product in products {
        let rows: Vec<&InventoryEntry> = inventory
            .entries()
            .iter()
            .filter(|e| e.product == product)
            .collect();
        let high: Vec<&InventoryEntry> = rows
            .iter()
            .copied()
            .filter(|e| u64::from(e.units_in_stock) > high_threshold)
            .collect();

        for low in rows.iter().filter(|e| e.units_in_stock < config.low_threshold) {
            let Some(source) = high.iter().find(|h| h.store != low.store) else {
                continue;
            };

            let quantity = config.move_qty.min(source.units_in_stock / 4);
            if quantity == 0 {
                continue;
            }

            suggestions.push(TransferRecommendation {
                from_store: source.store.clone(),
                to_store: low.store.clone(),
                product: product.to_string(),
                quantity,
                reason: format!("Low stock at {} ({})", low.store, low.units_in_stock),
            });
        }
    }

    suggestions
}
