//! Test context for service-level tests.

use std::sync::Arc;

use crate::{
    auth::AppAuthService,
    domain::{
        carts::AppCartsService,
        orders::{
            AppOrdersService,
            numbers::{OrderNumbers, TimestampOrderNumbers},
            status::TransitionPolicy,
        },
        products::{
            AppProductsService, ProductsService,
            models::{Product, ProductUuid},
            repository::{ProductsRepository, StockAdjustment},
        },
        stock::StockLedger,
    },
    storage::{InMemoryStore, Repositories},
    test::helpers::new_product,
};

/// Services wired to a fresh in-memory store.
pub(crate) struct TestContext {
    pub repositories: Repositories,
    pub products: AppProductsService,
    pub carts: AppCartsService,
    pub orders: AppOrdersService,
    pub auth: AppAuthService,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        Self::with_policy(TransitionPolicy::default())
    }

    pub(crate) fn with_policy(policy: TransitionPolicy) -> Self {
        let store = Arc::new(InMemoryStore::new());

        Self::build(
            Repositories::in_memory(&store),
            Arc::new(TimestampOrderNumbers),
            policy,
        )
    }

    /// Wires the services to the given repositories, e.g. a store with one
    /// repository swapped for a misbehaving wrapper.
    pub(crate) fn with_repositories(
        repositories: Repositories,
        numbers: Arc<dyn OrderNumbers>,
    ) -> Self {
        Self::build(repositories, numbers, TransitionPolicy::default())
    }

    fn build(
        repositories: Repositories,
        numbers: Arc<dyn OrderNumbers>,
        policy: TransitionPolicy,
    ) -> Self {
        let ledger = StockLedger::new(repositories.products.clone());

        Self {
            products: AppProductsService::new(repositories.products.clone(), ledger.clone()),
            carts: AppCartsService::new(
                repositories.carts.clone(),
                repositories.cart_lines.clone(),
                repositories.products.clone(),
            ),
            orders: AppOrdersService::new(&repositories, ledger, numbers, policy),
            auth: AppAuthService::new(repositories.auth.clone()),
            repositories,
        }
    }

    /// Creates a catalog product.
    pub(crate) async fn product(
        &self,
        title: &str,
        price: &str,
        discount: &str,
        stock: u32,
    ) -> Product {
        self.products
            .create_product(new_product(title, price, discount, stock))
            .await
            .expect("Failed to create test product")
    }

    /// Current stock level, deleted products included.
    pub(crate) async fn stock(&self, product: ProductUuid) -> u32 {
        match self
            .repositories
            .products
            .adjust_stock(product, 0)
            .await
            .expect("Failed to read stock")
        {
            StockAdjustment::Applied { stock } => stock,
            StockAdjustment::Rejected { available } => available,
        }
    }
}
