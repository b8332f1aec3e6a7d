//! Test Helpers

use std::{
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    domain::{
        carts::{
            models::{CartLine, CartLineUuid, CartUuid, NewCartLine},
            repositories::CartLinesRepository,
        },
        orders::models::{Address, Checkout, PaymentMethod},
        owners::{Owner, SessionId, UserUuid},
        products::{
            models::{NewProduct, Product, ProductUpdate, ProductUuid},
            repository::{ProductsRepository, StockAdjustment},
        },
    },
    storage::RepositoryError,
};

pub(crate) fn new_product(title: &str, price: &str, discount: &str, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        title: title.to_string(),
        description: format!("{title} description"),
        brand: Some("Acme".to_string()),
        thumbnail: None,
        category: "home".to_string(),
        price: Decimal::from_str(price).expect("valid price"),
        discount_percentage: Decimal::from_str(discount).expect("valid discount"),
        stock,
    }
}

pub(crate) fn session_owner(id: &str) -> Owner {
    Owner::Session(SessionId::parse(id).expect("valid session id"))
}

pub(crate) fn user_owner() -> (UserUuid, Owner) {
    let user = UserUuid::new();

    (user, Owner::User(user))
}

pub(crate) fn address() -> Address {
    Address {
        full_name: "Ada Lovelace".to_string(),
        line1: "12 Analytical Row".to_string(),
        line2: None,
        city: "London".to_string(),
        state: None,
        postal_code: "N1 9GU".to_string(),
        country: "GB".to_string(),
        phone: Some("+44 20 7946 0000".to_string()),
    }
}

pub(crate) fn checkout(payment_method: PaymentMethod) -> Checkout {
    Checkout {
        shipping_address: address(),
        billing_address: None,
        payment_method,
        payment_id: None,
        notes: None,
    }
}

/// Wraps a products repository and, once armed, quietly takes `units` out of
/// the stock of `target` the next time it is read. The read still reports the
/// old level, as if another order committed between the check and the debit.
pub(crate) struct StockThief {
    inner: Arc<dyn ProductsRepository>,
    target: ProductUuid,
    units: u32,
    armed: AtomicBool,
}

impl StockThief {
    pub(crate) fn new(inner: Arc<dyn ProductsRepository>, target: ProductUuid, units: u32) -> Self {
        Self {
            inner,
            target,
            units,
            armed: AtomicBool::new(false),
        }
    }

    pub(crate) fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductsRepository for StockThief {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        self.inner.list_products().await
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, RepositoryError> {
        let snapshot = self.inner.get_product(product).await?;

        if product == self.target && self.armed.swap(false, Ordering::SeqCst) {
            self.inner
                .adjust_stock(product, -i64::from(self.units))
                .await?;
        }

        Ok(snapshot)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        self.inner.create_product(product).await
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        self.inner.update_product(product, update).await
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<u64, RepositoryError> {
        self.inner.delete_product(product).await
    }

    async fn adjust_stock(
        &self,
        product: ProductUuid,
        delta: i64,
    ) -> Result<StockAdjustment, RepositoryError> {
        self.inner.adjust_stock(product, delta).await
    }
}

/// Wraps a cart lines repository and, once armed, slips `line` into the cart
/// right after the next listing, as if the shopper added it mid-checkout.
pub(crate) struct LateLine {
    inner: Arc<dyn CartLinesRepository>,
    line: NewCartLine,
    armed: AtomicBool,
}

impl LateLine {
    pub(crate) fn new(inner: Arc<dyn CartLinesRepository>, line: NewCartLine) -> Self {
        Self {
            inner,
            line,
            armed: AtomicBool::new(false),
        }
    }

    pub(crate) fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CartLinesRepository for LateLine {
    async fn list_lines(&self, cart: CartUuid) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = self.inner.list_lines(cart).await?;

        if self.armed.swap(false, Ordering::SeqCst) {
            self.inner.create_line(cart, self.line.clone()).await?;
        }

        Ok(lines)
    }

    async fn get_line(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
    ) -> Result<Option<CartLine>, RepositoryError> {
        self.inner.get_line(cart, line).await
    }

    async fn find_line_for_product(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<Option<CartLine>, RepositoryError> {
        self.inner.find_line_for_product(cart, product).await
    }

    async fn create_line(
        &self,
        cart: CartUuid,
        line: NewCartLine,
    ) -> Result<CartLine, RepositoryError> {
        self.inner.create_line(cart, line).await
    }

    async fn set_quantity(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<Option<CartLine>, RepositoryError> {
        self.inner.set_quantity(cart, line, quantity).await
    }

    async fn delete_line(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
    ) -> Result<u64, RepositoryError> {
        self.inner.delete_line(cart, line).await
    }

    async fn delete_lines(&self, cart: CartUuid) -> Result<u64, RepositoryError> {
        self.inner.delete_lines(cart).await
    }

    async fn take_lines(&self, cart: CartUuid) -> Result<Vec<CartLine>, RepositoryError> {
        self.inner.take_lines(cart).await
    }
}
