//! Applying a single approved transfer to an inventory snapshot.

use crate::domain::error::StockshiftError;
use crate::domain::records::InventorySnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub from_store: String,
    pub to_store: String,
    pub product: String,
    pub quantity: u32,
}

fn rejected(reason: String) -> StockshiftError {
    StockshiftError::TransferRejected { reason }
}

/// Returns a copy of `inventory` with the requested units moved. The source
/// row must exist and hold enough stock; a missing destination row is created
/// at the end of the snapshot.
pub fn execute_transfer(
    inventory: &InventorySnapshot,
    request: &TransferRequest,
) -> Result<InventorySnapshot, StockshiftError> {
    if request.from_store == request.to_store {
        return Err(rejected(format!(
            "source and destination are both {}",
            request.from_store
        )));
    }
    if request.quantity == 0 {
        return Err(rejected("quantity must be positive".into()));
    }

    let available = inventory
        .get(&request.from_store, &request.product)
        .ok_or_else(|| {
            rejected(format!(
                "{} has no stock row for {}",
                request.from_store, request.product
            ))
        })?;
    if available < request.quantity {
        return Err(rejected(format!(
            "not enough stock: {} holds {} of {}, requested {}",
            request.from_store, available, request.product, request.quantity
        )));
    }

    let destination = inventory
        .get(&request.to_store, &request.product)
        .unwrap_or(0);
    let received = destination.checked_add(request.quantity).ok_or_else(|| {
        rejected(format!(
            "{} stock of {} would overflow",
            request.to_store, request.product
        ))
    })?;

    let mut updated = inventory.clone();
    updated.insert(&request.from_store, &request.product, available - request.quantity);
    updated.insert(&request.to_store, &request.product, received);

    tracing::info!(
        from = %request.from_store,
        to = %request.to_store,
        product = %request.product,
        quantity = request.quantity,
        "transfer applied"
    );
    Ok(updated)
}
