//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{
    products::{
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUpdate, ProductUuid},
        repository::ProductsRepository,
    },
    stock::StockLedger,
};

#[derive(Clone)]
pub struct AppProductsService {
    repository: Arc<dyn ProductsRepository>,
    ledger: StockLedger,
}

impl AppProductsService {
    #[must_use]
    pub fn new(repository: Arc<dyn ProductsRepository>, ledger: StockLedger) -> Self {
        Self { repository, ledger }
    }
}

/// Money and percentages are stored to two decimal places.
const PRICING_SCALE: u32 = 2;

/// Rejects negative prices, discounts outside `0..=100`, and values finer
/// than storage keeps. Trailing zeros are not significant.
fn validate_pricing(price: Decimal, discount_percentage: Decimal) -> Result<(), ProductsServiceError> {
    if price < Decimal::ZERO {
        return Err(ProductsServiceError::NegativePrice);
    }

    if discount_percentage < Decimal::ZERO || discount_percentage > Decimal::ONE_HUNDRED {
        return Err(ProductsServiceError::InvalidDiscount);
    }

    if price.normalize().scale() > PRICING_SCALE
        || discount_percentage.normalize().scale() > PRICING_SCALE
    {
        return Err(ProductsServiceError::TooPrecise);
    }

    Ok(())
}

#[async_trait]
impl ProductsService for AppProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self.repository.list_products().await?)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        Ok(self.repository.get_product(product).await?)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        validate_pricing(product.price, product.discount_percentage)?;

        Ok(self.repository.create_product(product).await?)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        validate_pricing(update.price, update.discount_percentage)?;

        Ok(self.repository.update_product(product, update).await?)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let rows_affected = self.repository.delete_product(product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        Ok(())
    }

    async fn restock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Product, ProductsServiceError> {
        if quantity == 0 {
            return Err(ProductsServiceError::InvalidQuantity);
        }

        // Restocking a deleted product is refused; cancellations credit it directly.
        self.repository.get_product(product).await?;

        let stock = self.ledger.credit(product, quantity).await?;

        info!(%product, quantity, stock, "product restocked");

        Ok(self.repository.get_product(product).await?)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products that have not been deleted.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product with the given details.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Replaces a product's catalog details. Existing cart and order snapshots
    /// are not affected.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Adds units to a product's stock through the ledger.
    async fn restock(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Product, ProductsServiceError>;
}
