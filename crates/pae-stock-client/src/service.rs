//! Stock lookups on top of a movement source.
//!
//! [`StockService`] fetches a product's movement log and replays it through
//! the reconstructor. A failed fetch never reaches the caller of
//! [`StockService::snapshot`]: the product is shown as out of stock and the
//! failure is logged.

use crate::error::ClientError;
use crate::source::MovementSource;
use pae_stock_core::{
    reconstruct_with_report, visible_movements, LocationFilter, MovementRecord, Reconstruction,
    StockSnapshot,
};

/// Derives stock views from a [`MovementSource`].
#[derive(Debug, Clone)]
pub struct StockService<S> {
    source: S,
}

impl<S: MovementSource> StockService<S> {
    /// Create a service reading from `source`.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying movement source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Current stock of a product.
    ///
    /// If the movement log cannot be fetched, returns an empty snapshot
    /// instead of an error.
    pub fn snapshot(
        &self,
        product_id: &str,
        institution_id: Option<i64>,
        filter: &LocationFilter,
    ) -> StockSnapshot {
        self.reconstruction(product_id, institution_id, filter).snapshot
    }

    /// Current stock of a product together with any shortfalls found while
    /// replaying its log.
    ///
    /// If the movement log cannot be fetched, returns an empty snapshot with
    /// no shortfalls.
    pub fn reconstruction(
        &self,
        product_id: &str,
        institution_id: Option<i64>,
        filter: &LocationFilter,
    ) -> Reconstruction {
        match self.try_reconstruction(product_id, institution_id, filter) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    "Could not load movements for {} from {} source, reporting no stock: {}",
                    product_id,
                    self.source.name(),
                    e
                );
                Reconstruction {
                    snapshot: StockSnapshot::empty(product_id, institution_id),
                    shortfalls: Vec::new(),
                }
            }
        }
    }

    /// Current stock of a product, propagating fetch errors.
    ///
    /// # Errors
    ///
    /// Returns the source's [`ClientError`] if the log cannot be fetched.
    pub fn try_reconstruction(
        &self,
        product_id: &str,
        institution_id: Option<i64>,
        filter: &LocationFilter,
    ) -> Result<Reconstruction, ClientError> {
        let movements = self.source.fetch_movements(product_id, institution_id)?;
        let result = reconstruct_with_report(&movements, product_id, institution_id, filter);

        for shortfall in &result.shortfalls {
            tracing::warn!("Inconsistent movement log for {}: {}", product_id, shortfall);
        }
        tracing::debug!(
            "{}: {} {} in {} batches",
            product_id,
            result.snapshot.total_available,
            result.snapshot.unit,
            result.snapshot.batches.len()
        );

        Ok(result)
    }

    /// The user-facing movement log of a product: internal bookkeeping
    /// removed, newest first.
    ///
    /// # Errors
    ///
    /// Returns the source's [`ClientError`] if the log cannot be fetched.
    pub fn movement_log(
        &self,
        product_id: &str,
        institution_id: Option<i64>,
    ) -> Result<Vec<MovementRecord>, ClientError> {
        let movements = self.source.fetch_movements(product_id, institution_id)?;
        Ok(visible_movements(&movements))
    }
}
