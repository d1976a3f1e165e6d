//! First-fit transfer matcher over forecast gaps.
//!
//! Each shortage is paired with the first surplus of the same product at a
//! different store that still has units left. The surplus is drawn down in a
//! local working copy; the shortage side is never decremented, so a shortage
//! is served by at most one source per pass.

use crate::domain::records::{GapEntry, TransferRecommendation};

pub const DEFAULT_SURPLUS_THRESHOLD: i64 = 30;
pub const DEFAULT_SHORTAGE_THRESHOLD: i64 = -20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Gaps strictly above this are surplus.
    pub surplus_threshold: i64,
    /// Gaps strictly below this are shortage.
    pub shortage_threshold: i64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            surplus_threshold: DEFAULT_SURPLUS_THRESHOLD,
            shortage_threshold: DEFAULT_SHORTAGE_THRESHOLD,
        }
    }
}

struct Surplus<'a> {
    entry: &'a GapEntry,
    remaining: i64,
}

pub fn match_transfers(gaps: &[GapEntry], config: &MatcherConfig) -> Vec<TransferRecommendation> {
    let shortages = gaps.iter().filter(|g| g.gap < config.shortage_threshold);
    let mut surpluses: Vec<Surplus<'_>> = gaps
        .iter()
        .filter(|g| g.gap > config.surplus_threshold)
        .map(|entry| Surplus {
            entry,
            remaining: entry.gap,
        })
        .collect();

    let mut transfers = Vec::new();

    for shortage in shortages {
        for source in surpluses.iter_mut() {
            if source.entry.product != shortage.product || source.entry.store == shortage.store {
                continue;
            }

            let qty = shortage.gap.unsigned_abs().min(source.remaining.max(0) as u64);
            if qty == 0 {
                continue;
            }

            source.remaining -= qty as i64;
            transfers.push(TransferRecommendation {
                from_store: source.entry.store.clone(),
                to_store: shortage.store.clone(),
                product: shortage.product.clone(),
                quantity: u32::try_from(qty).unwrap_or(u32::MAX),
                reason: format!(
                    "Forecast shortage at {} (gap {}), surplus at {} (gap {})",
                    shortage.store, shortage.gap, source.entry.store, source.entry.gap
                ),
            });
            break;
        }
    }

    tracing::debug!(
        transfers = transfers.len(),
        surplus_threshold = config.surplus_threshold,
        shortage_threshold = config.shortage_threshold,
        "transfer matching complete"
    );
    transfers
}
