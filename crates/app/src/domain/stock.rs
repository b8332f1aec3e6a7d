//! Stock Ledger
//!
//! The only path that moves product stock. Every adjustment is a single guarded
//! update, so concurrent debits can never take a product below zero.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    domain::products::{
        models::ProductUuid,
        repository::{ProductsRepository, StockAdjustment},
    },
    storage::RepositoryError,
};

#[derive(Debug, Error)]
pub enum StockLedgerError {
    #[error("stock for product {product} cannot move by {delta}, only {available} available")]
    StockViolation {
        product: ProductUuid,
        available: u32,
        delta: i64,
    },

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("storage error")]
    Storage(#[source] RepositoryError),
}

#[derive(Clone)]
pub struct StockLedger {
    products: Arc<dyn ProductsRepository>,
}

impl Debug for StockLedger {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StockLedger").finish_non_exhaustive()
    }
}

impl StockLedger {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsRepository>) -> Self {
        Self { products }
    }

    /// Atomically applies `stock += delta`, returning the new stock level.
    ///
    /// # Errors
    ///
    /// Returns [`StockLedgerError::StockViolation`] when the result would be
    /// negative. Stock is left untouched in that case.
    pub async fn adjust(&self, product: ProductUuid, delta: i64) -> Result<u32, StockLedgerError> {
        match self.products.adjust_stock(product, delta).await {
            Ok(StockAdjustment::Applied { stock }) => {
                debug!(%product, delta, stock, "stock adjusted");

                Ok(stock)
            }
            Ok(StockAdjustment::Rejected { available }) => {
                warn!(%product, delta, available, "stock adjustment rejected");

                Err(StockLedgerError::StockViolation {
                    product,
                    available,
                    delta,
                })
            }
            Err(RepositoryError::NotFound) => Err(StockLedgerError::ProductNotFound(product)),
            Err(error) => Err(StockLedgerError::Storage(error)),
        }
    }

    /// Takes `quantity` units out of stock.
    ///
    /// # Errors
    ///
    /// See [`StockLedger::adjust`].
    pub async fn debit(&self, product: ProductUuid, quantity: u32) -> Result<u32, StockLedgerError> {
        self.adjust(product, -i64::from(quantity)).await
    }

    /// Puts `quantity` units back into stock.
    ///
    /// # Errors
    ///
    /// See [`StockLedger::adjust`].
    pub async fn credit(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u32, StockLedgerError> {
        self.adjust(product, i64::from(quantity)).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::domain::products::repository::MockProductsRepository;

    use super::*;

    fn ledger(repository: MockProductsRepository) -> StockLedger {
        StockLedger::new(Arc::new(repository))
    }

    #[tokio::test]
    async fn debit_applies_a_negative_delta() -> TestResult {
        let product = ProductUuid::new();
        let mut repository = MockProductsRepository::new();

        repository
            .expect_adjust_stock()
            .once()
            .with(eq(product), eq(-3))
            .return_once(|_, _| Ok(StockAdjustment::Applied { stock: 7 }));

        assert_eq!(ledger(repository).debit(product, 3).await?, 7);

        Ok(())
    }

    #[tokio::test]
    async fn credit_applies_a_positive_delta() -> TestResult {
        let product = ProductUuid::new();
        let mut repository = MockProductsRepository::new();

        repository
            .expect_adjust_stock()
            .once()
            .with(eq(product), eq(4))
            .return_once(|_, _| Ok(StockAdjustment::Applied { stock: 14 }));

        assert_eq!(ledger(repository).credit(product, 4).await?, 14);

        Ok(())
    }

    #[tokio::test]
    async fn rejected_adjustment_is_a_stock_violation() {
        let product = ProductUuid::new();
        let mut repository = MockProductsRepository::new();

        repository
            .expect_adjust_stock()
            .once()
            .return_once(|_, _| Ok(StockAdjustment::Rejected { available: 2 }));

        let result = ledger(repository).debit(product, 5).await;

        assert!(
            matches!(
                result,
                Err(StockLedgerError::StockViolation { available: 2, delta: -5, .. })
            ),
            "expected StockViolation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_product_is_reported() {
        let product = ProductUuid::new();
        let mut repository = MockProductsRepository::new();

        repository
            .expect_adjust_stock()
            .once()
            .return_once(|_, _| Err(RepositoryError::NotFound));

        let result = ledger(repository).credit(product, 1).await;

        assert!(
            matches!(result, Err(StockLedgerError::ProductNotFound(p)) if p == product),
            "expected ProductNotFound, got {result:?}"
        );
    }
}
