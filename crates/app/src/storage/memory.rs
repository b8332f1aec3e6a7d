//! Process-local storage used by tests and by the API when no database is configured.
//!
//! Mirrors the constraints of the Postgres schema: one active cart per owner,
//! one line per product in a cart, unique order numbers, cascading deletes and
//! a stock level that never drops below zero.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::Mutex;

use crate::{
    auth::{AuthRepository, NewUserToken, UserToken, UserTokenUuid},
    domain::{
        carts::{
            models::{Cart, CartLine, CartLineUuid, CartUuid, NewCart, NewCartLine},
            repositories::{CartLinesRepository, CartsRepository},
        },
        orders::{
            models::{NewOrder, NewOrderLine, Order, OrderLine, OrderUuid, StatusChange},
            repositories::{OrderLinesRepository, OrdersRepository},
            status::OrderStatus,
        },
        owners::Owner,
        products::{
            models::{NewProduct, Product, ProductUpdate, ProductUuid},
            repository::{ProductsRepository, StockAdjustment},
        },
    },
    storage::RepositoryError,
};

#[derive(Debug, Clone)]
struct StoredProduct {
    product: Product,
    deleted: bool,
}

#[derive(Debug, Clone)]
struct StoredToken {
    token: UserToken,
    token_hash: String,
}

#[derive(Debug, Default)]
struct State {
    products: Vec<StoredProduct>,
    carts: Vec<Cart>,
    cart_lines: Vec<CartLine>,
    orders: Vec<Order>,
    order_lines: Vec<OrderLine>,
    tokens: Vec<StoredToken>,
}

impl State {
    fn product_exists(&self, product: ProductUuid) -> bool {
        self.products.iter().any(|p| p.product.uuid == product)
    }

    fn live_product_mut(&mut self, product: ProductUuid) -> Option<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.product.uuid == product && !p.deleted)
            .map(|p| &mut p.product)
    }

    fn cart_exists(&self, cart: CartUuid) -> bool {
        self.carts.iter().any(|c| c.uuid == cart)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Debug for InMemoryStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InMemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProductsRepository for InMemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .products
            .iter()
            .filter(|p| !p.deleted)
            .map(|p| p.product.clone())
            .collect())
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, RepositoryError> {
        let state = self.state.lock().await;

        state
            .products
            .iter()
            .find(|p| p.product.uuid == product && !p.deleted)
            .map(|p| p.product.clone())
            .ok_or(RepositoryError::NotFound)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut state = self.state.lock().await;

        if state.product_exists(product.uuid) {
            return Err(RepositoryError::AlreadyExists);
        }

        let now = Timestamp::now();

        let created = Product {
            uuid: product.uuid,
            title: product.title,
            description: product.description,
            brand: product.brand,
            thumbnail: product.thumbnail,
            category: product.category,
            price: product.price,
            discount_percentage: product.discount_percentage,
            stock: product.stock,
            created_at: now,
            updated_at: now,
        };

        state.products.push(StoredProduct {
            product: created.clone(),
            deleted: false,
        });

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let mut state = self.state.lock().await;

        let stored = state
            .live_product_mut(product)
            .ok_or(RepositoryError::NotFound)?;

        stored.title = update.title;
        stored.description = update.description;
        stored.brand = update.brand;
        stored.thumbnail = update.thumbnail;
        stored.category = update.category;
        stored.price = update.price;
        stored.discount_percentage = update.discount_percentage;
        stored.updated_at = Timestamp::now();

        Ok(stored.clone())
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let Some(stored) = state
            .products
            .iter_mut()
            .find(|p| p.product.uuid == product && !p.deleted)
        else {
            return Ok(0);
        };

        stored.deleted = true;
        stored.product.updated_at = Timestamp::now();

        Ok(1)
    }

    async fn adjust_stock(
        &self,
        product: ProductUuid,
        delta: i64,
    ) -> Result<StockAdjustment, RepositoryError> {
        let mut state = self.state.lock().await;

        let stored = state
            .products
            .iter_mut()
            .find(|p| p.product.uuid == product)
            .map(|p| &mut p.product)
            .ok_or(RepositoryError::NotFound)?;

        let next = i64::from(stored.stock) + delta;

        if next < 0 {
            return Ok(StockAdjustment::Rejected {
                available: stored.stock,
            });
        }

        stored.stock = u32::try_from(next).map_err(|_| RepositoryError::InvalidData)?;
        stored.updated_at = Timestamp::now();

        Ok(StockAdjustment::Applied {
            stock: stored.stock,
        })
    }
}

#[async_trait]
impl CartsRepository for InMemoryStore {
    async fn find_active_cart(&self, owner: &Owner) -> Result<Option<Cart>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .carts
            .iter()
            .find(|c| c.is_active && &c.owner == owner)
            .cloned())
    }

    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, RepositoryError> {
        let state = self.state.lock().await;

        state
            .carts
            .iter()
            .find(|c| c.uuid == cart)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create_cart(&self, cart: NewCart) -> Result<Cart, RepositoryError> {
        let mut state = self.state.lock().await;

        let taken = state
            .carts
            .iter()
            .any(|c| c.uuid == cart.uuid || (c.is_active && c.owner == cart.owner));

        if taken {
            return Err(RepositoryError::AlreadyExists);
        }

        let now = Timestamp::now();

        let created = Cart {
            uuid: cart.uuid,
            owner: cart.owner,
            is_active: true,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        state.carts.push(created.clone());

        Ok(created)
    }

    async fn deactivate_cart(&self, cart: CartUuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let Some(stored) = state.carts.iter_mut().find(|c| c.uuid == cart && c.is_active) else {
            return Ok(0);
        };

        stored.is_active = false;
        stored.updated_at = Timestamp::now();

        Ok(1)
    }

    async fn delete_cart(&self, cart: CartUuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let before = state.carts.len();

        state.carts.retain(|c| c.uuid != cart);
        state.cart_lines.retain(|l| l.cart_uuid != cart);

        Ok((before - state.carts.len()) as u64)
    }
}

#[async_trait]
impl CartLinesRepository for InMemoryStore {
    async fn list_lines(&self, cart: CartUuid) -> Result<Vec<CartLine>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .cart_lines
            .iter()
            .filter(|l| l.cart_uuid == cart)
            .cloned()
            .collect())
    }

    async fn get_line(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .cart_lines
            .iter()
            .find(|l| l.cart_uuid == cart && l.uuid == line)
            .cloned())
    }

    async fn find_line_for_product(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<Option<CartLine>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .cart_lines
            .iter()
            .find(|l| l.cart_uuid == cart && l.product_uuid == product)
            .cloned())
    }

    async fn create_line(
        &self,
        cart: CartUuid,
        line: NewCartLine,
    ) -> Result<CartLine, RepositoryError> {
        let mut state = self.state.lock().await;

        if !state.cart_exists(cart) || !state.product_exists(line.product_uuid) {
            return Err(RepositoryError::InvalidReference);
        }

        if line.quantity == 0 {
            return Err(RepositoryError::InvalidData);
        }

        let duplicate = state.cart_lines.iter().any(|l| {
            l.uuid == line.uuid || (l.cart_uuid == cart && l.product_uuid == line.product_uuid)
        });

        if duplicate {
            return Err(RepositoryError::AlreadyExists);
        }

        let now = Timestamp::now();

        let created = CartLine {
            uuid: line.uuid,
            cart_uuid: cart,
            product_uuid: line.product_uuid,
            quantity: line.quantity,
            price_at_time: line.price_at_time,
            discount_at_time: line.discount_at_time,
            created_at: now,
            updated_at: now,
        };

        state.cart_lines.push(created.clone());

        Ok(created)
    }

    async fn set_quantity(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<Option<CartLine>, RepositoryError> {
        if quantity == 0 {
            return Err(RepositoryError::InvalidData);
        }

        let mut state = self.state.lock().await;

        let Some(stored) = state
            .cart_lines
            .iter_mut()
            .find(|l| l.cart_uuid == cart && l.uuid == line)
        else {
            return Ok(None);
        };

        stored.quantity = quantity;
        stored.updated_at = Timestamp::now();

        Ok(Some(stored.clone()))
    }

    async fn delete_line(
        &self,
        cart: CartUuid,
        line: CartLineUuid,
    ) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let before = state.cart_lines.len();

        state
            .cart_lines
            .retain(|l| !(l.cart_uuid == cart && l.uuid == line));

        Ok((before - state.cart_lines.len()) as u64)
    }

    async fn delete_lines(&self, cart: CartUuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let before = state.cart_lines.len();

        state.cart_lines.retain(|l| l.cart_uuid != cart);

        Ok((before - state.cart_lines.len()) as u64)
    }

    async fn take_lines(&self, cart: CartUuid) -> Result<Vec<CartLine>, RepositoryError> {
        let mut state = self.state.lock().await;

        let (taken, kept): (Vec<_>, Vec<_>) = state
            .cart_lines
            .drain(..)
            .partition(|l| l.cart_uuid == cart);

        state.cart_lines = kept;

        Ok(taken)
    }
}

#[async_trait]
impl OrdersRepository for InMemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().await;

        let duplicate = state
            .orders
            .iter()
            .any(|o| o.uuid == order.uuid || o.order_number == order.order_number);

        if duplicate {
            return Err(RepositoryError::AlreadyExists);
        }

        let now = Timestamp::now();

        let created = Order {
            uuid: order.uuid,
            order_number: order.order_number,
            owner: order.owner,
            status: order.status,
            payment_status: order.payment_status,
            payment_method: order.payment_method,
            payment_id: order.payment_id,
            total_amount: order.total_amount,
            discounted_total: order.discounted_total,
            shipping_cost: order.shipping_cost,
            tax: order.tax,
            total_products: order.total_products,
            total_quantity: order.total_quantity,
            shipping_address: order.shipping_address,
            billing_address: order.billing_address,
            tracking_number: None,
            notes: order.notes,
            estimated_delivery: order.estimated_delivery,
            delivered_at: None,
            created_at: now,
            updated_at: now,
            lines: Vec::new(),
        };

        state.orders.push(created.clone());

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, RepositoryError> {
        let state = self.state.lock().await;

        state
            .orders
            .iter()
            .find(|o| o.uuid == order)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_orders(&self, owner: &Owner) -> Result<Vec<Order>, RepositoryError> {
        let state = self.state.lock().await;

        // Later inserts win ties on `created_at`.
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .rev()
            .filter(|o| &o.owner == owner)
            .cloned()
            .collect();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        expected: OrderStatus,
        change: StatusChange,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut state = self.state.lock().await;

        let Some(stored) = state
            .orders
            .iter_mut()
            .find(|o| o.uuid == order && o.status == expected)
        else {
            return Ok(None);
        };

        stored.status = change.status;
        stored.payment_status = change.payment_status;

        if let Some(payment_id) = change.payment_id {
            stored.payment_id = Some(payment_id);
        }

        if let Some(tracking_number) = change.tracking_number {
            stored.tracking_number = Some(tracking_number);
        }

        if let Some(delivered_at) = change.delivered_at {
            stored.delivered_at = Some(delivered_at);
        }

        if let Some(notes) = change.notes {
            stored.notes = Some(notes);
        }

        stored.updated_at = Timestamp::now();

        Ok(Some(stored.clone()))
    }

    async fn discard_order(&self, order: OrderUuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let before = state.orders.len();

        state.orders.retain(|o| o.uuid != order);
        state.order_lines.retain(|l| l.order_uuid != order);

        Ok((before - state.orders.len()) as u64)
    }
}

#[async_trait]
impl OrderLinesRepository for InMemoryStore {
    async fn create_line(
        &self,
        order: OrderUuid,
        line: NewOrderLine,
    ) -> Result<OrderLine, RepositoryError> {
        let mut state = self.state.lock().await;

        let order_exists = state.orders.iter().any(|o| o.uuid == order);

        if !order_exists || !state.product_exists(line.product_uuid) {
            return Err(RepositoryError::InvalidReference);
        }

        if state.order_lines.iter().any(|l| l.uuid == line.uuid) {
            return Err(RepositoryError::AlreadyExists);
        }

        let created = OrderLine {
            uuid: line.uuid,
            order_uuid: order,
            product_uuid: line.product_uuid,
            snapshot: line.snapshot,
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_percentage: line.discount_percentage,
            discounted_price: line.discounted_price,
            line_total: line.line_total,
            created_at: Timestamp::now(),
        };

        state.order_lines.push(created.clone());

        Ok(created)
    }

    async fn list_lines(&self, order: OrderUuid) -> Result<Vec<OrderLine>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .order_lines
            .iter()
            .filter(|l| l.order_uuid == order)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuthRepository for InMemoryStore {
    async fn create_token(&self, token: NewUserToken) -> Result<UserToken, RepositoryError> {
        let mut state = self.state.lock().await;

        let duplicate = state
            .tokens
            .iter()
            .any(|t| t.token.uuid == token.uuid || t.token_hash == token.token_hash);

        if duplicate {
            return Err(RepositoryError::AlreadyExists);
        }

        let created = UserToken {
            uuid: token.uuid,
            user_uuid: token.user_uuid,
            is_admin: token.is_admin,
            created_at: Timestamp::now(),
            revoked_at: None,
        };

        state.tokens.push(StoredToken {
            token: created.clone(),
            token_hash: token.token_hash,
        });

        Ok(created)
    }

    async fn find_active_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserToken>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.token.revoked_at.is_none())
            .map(|t| t.token.clone()))
    }

    async fn revoke_token(&self, token: UserTokenUuid) -> Result<u64, RepositoryError> {
        let mut state = self.state.lock().await;

        let Some(stored) = state
            .tokens
            .iter_mut()
            .find(|t| t.token.uuid == token && t.token.revoked_at.is_none())
        else {
            return Ok(0);
        };

        stored.token.revoked_at = Some(Timestamp::now());

        Ok(1)
    }
}
