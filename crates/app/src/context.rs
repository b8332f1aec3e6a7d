//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AppAuthService, AuthService},
    database::{self, Db},
    domain::{
        carts::{AppCartsService, CartsService},
        orders::{
            AppOrdersService, OrdersService, numbers::TimestampOrderNumbers,
            status::TransitionPolicy,
        },
        products::{AppProductsService, ProductsService},
        stock::StockLedger,
    },
    storage::{InMemoryStore, Repositories},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        policy: TransitionPolicy,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_repositories(
            &Repositories::postgres(&Db::new(pool)),
            policy,
        ))
    }

    /// Build application context backed by process-local storage.
    #[must_use]
    pub fn in_memory(policy: TransitionPolicy) -> Self {
        Self::from_repositories(
            &Repositories::in_memory(&Arc::new(InMemoryStore::new())),
            policy,
        )
    }

    #[must_use]
    pub fn from_repositories(repositories: &Repositories, policy: TransitionPolicy) -> Self {
        let ledger = StockLedger::new(repositories.products.clone());

        Self {
            products: Arc::new(AppProductsService::new(
                repositories.products.clone(),
                ledger.clone(),
            )),
            carts: Arc::new(AppCartsService::new(
                repositories.carts.clone(),
                repositories.cart_lines.clone(),
                repositories.products.clone(),
            )),
            orders: Arc::new(AppOrdersService::new(
                repositories,
                ledger,
                Arc::new(TimestampOrderNumbers),
                policy,
            )),
            auth: Arc::new(AppAuthService::new(repositories.auth.clone())),
        }
    }
}
