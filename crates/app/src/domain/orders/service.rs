//! Orders service.
//!
//! Placing an order touches several records that storage cannot update
//! atomically together. Every multi-step write here either completes or is
//! compensated, so a failed call never leaves a reachable half-built order or
//! stock that does not match the orders holding it.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::{error, info, warn};

use crate::{
    domain::{
        carts::{
            models::CartLine,
            repositories::{CartLinesRepository, CartsRepository},
        },
        orders::{
            errors::OrdersServiceError,
            models::{
                Checkout, NewOrder, NewOrderLine, Order, OrderLine, OrderLineUuid, OrderUuid,
                ProductSnapshot, StatusChange, StatusUpdate,
            },
            numbers::OrderNumbers,
            repositories::{OrderLinesRepository, OrdersRepository},
            status::{OrderStatus, PaymentStatus, TransitionPolicy},
        },
        owners::Owner,
        pricing::{Tally, discounted_unit_price, round_money},
        products::{
            models::{Product, ProductUuid},
            repository::ProductsRepository,
        },
        stock::{StockLedger, StockLedgerError},
    },
    storage::{Repositories, RepositoryError},
};

/// How long after placement an order is expected to arrive.
pub const DELIVERY_WINDOW: SignedDuration = SignedDuration::from_hours(7 * 24);

/// Attempts at finding a free order number before giving up.
const ORDER_NUMBER_ATTEMPTS: usize = 2;

#[derive(Clone)]
pub struct AppOrdersService {
    carts: Arc<dyn CartsRepository>,
    cart_lines: Arc<dyn CartLinesRepository>,
    products: Arc<dyn ProductsRepository>,
    orders: Arc<dyn OrdersRepository>,
    order_lines: Arc<dyn OrderLinesRepository>,
    ledger: StockLedger,
    numbers: Arc<dyn OrderNumbers>,
    policy: TransitionPolicy,
}

impl AppOrdersService {
    #[must_use]
    pub fn new(
        repositories: &Repositories,
        ledger: StockLedger,
        numbers: Arc<dyn OrderNumbers>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            carts: repositories.carts.clone(),
            cart_lines: repositories.cart_lines.clone(),
            products: repositories.products.clone(),
            orders: repositories.orders.clone(),
            order_lines: repositories.order_lines.clone(),
            ledger,
            numbers,
            policy,
        }
    }

    async fn load_product(&self, product: ProductUuid) -> Result<Product, OrdersServiceError> {
        match self.products.get_product(product).await {
            Ok(product) => Ok(product),
            Err(RepositoryError::NotFound) => Err(OrdersServiceError::ProductNotFound(product)),
            Err(error) => Err(error.into()),
        }
    }

    async fn with_lines(&self, mut order: Order) -> Result<Order, OrdersServiceError> {
        order.lines = self.order_lines.list_lines(order.uuid).await?;

        Ok(order)
    }

    /// Orders belonging to someone else are reported as missing.
    async fn owned_order(&self, owner: &Owner, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let order = self.orders.get_order(order).await?;

        if order.owner != *owner {
            return Err(OrdersServiceError::NotFound);
        }

        Ok(order)
    }

    /// Writes the order header, drawing a new number if the first one is taken.
    async fn insert_header(&self, mut order: NewOrder) -> Result<Order, OrdersServiceError> {
        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            order.order_number = self.numbers.next_number();

            match self.orders.create_order(order.clone()).await {
                Ok(created) => return Ok(created),
                Err(RepositoryError::AlreadyExists) => {
                    warn!(order_number = %order.order_number, "order number collision");
                }
                Err(error) => return Err(error.into()),
            }
        }

        Err(OrdersServiceError::DuplicateOrderNumber)
    }

    /// Persists the lines and takes their units out of stock, recording every
    /// debit that went through.
    async fn commit_lines(
        &self,
        order: OrderUuid,
        lines: Vec<NewOrderLine>,
        debited: &mut Vec<(ProductUuid, u32)>,
    ) -> Result<Vec<OrderLine>, OrdersServiceError> {
        let mut created = Vec::with_capacity(lines.len());

        for line in lines {
            let (product, quantity) = (line.product_uuid, line.quantity);

            created.push(self.order_lines.create_line(order, line).await?);

            match self.ledger.debit(product, quantity).await {
                Ok(_) => debited.push((product, quantity)),
                Err(StockLedgerError::StockViolation {
                    product, available, ..
                }) => {
                    return Err(OrdersServiceError::StockRace { product, available });
                }
                Err(error) => return Err(error.into()),
            }
        }

        Ok(created)
    }

    /// Gives back every debit and removes the order with its lines.
    async fn roll_back_order(&self, order: OrderUuid, debited: &[(ProductUuid, u32)]) {
        for &(product, quantity) in debited.iter().rev() {
            if let Err(error) = self.ledger.credit(product, quantity).await {
                error!(%order, %product, quantity, %error, "failed to restore stock");
            }
        }

        if let Err(error) = self.orders.discard_order(order).await {
            error!(%order, %error, "failed to discard order");
        }
    }

    /// Takes back the credits of a failed cancellation and reopens the order.
    async fn roll_back_cancel(&self, order: &Order, credited: &[(ProductUuid, u32)]) {
        for &(product, quantity) in credited.iter().rev() {
            if let Err(error) = self.ledger.debit(product, quantity).await {
                error!(order = %order.uuid, %product, quantity, %error, "failed to re-debit stock");
            }
        }

        let reopened = self
            .orders
            .update_status(
                order.uuid,
                OrderStatus::Cancelled,
                StatusChange::new(order.status, order.payment_status),
            )
            .await;

        if let Err(error) = reopened {
            error!(order = %order.uuid, %error, "failed to restore order status");
        }
    }

    /// Applies a compare-and-set, naming the current status when it lost.
    async fn transition(
        &self,
        order: &Order,
        change: StatusChange,
    ) -> Result<Order, OrdersServiceError> {
        match self.orders.update_status(order.uuid, order.status, change).await? {
            Some(updated) => Ok(updated),
            None => {
                let current = self.orders.get_order(order.uuid).await?;

                Err(OrdersServiceError::InvalidTransition {
                    status: current.status,
                })
            }
        }
    }
}

/// Freezes a cart line and its product into an order line.
fn assemble_line(line: &CartLine, product: &Product) -> NewOrderLine {
    NewOrderLine {
        uuid: OrderLineUuid::new(),
        product_uuid: line.product_uuid,
        snapshot: ProductSnapshot::from(product),
        quantity: line.quantity,
        unit_price: line.price_at_time,
        discount_percentage: line.discount_at_time,
        discounted_price: round_money(discounted_unit_price(
            line.price_at_time,
            line.discount_at_time,
        )),
        line_total: line.line_total(),
    }
}

#[async_trait]
impl OrdersService for AppOrdersService {
    async fn create_order(
        &self,
        owner: &Owner,
        checkout: Checkout,
    ) -> Result<Order, OrdersServiceError> {
        let cart = self
            .carts
            .find_active_cart(owner)
            .await?
            .ok_or(OrdersServiceError::EmptyCart)?;

        let cart_lines = self.cart_lines.list_lines(cart.uuid).await?;

        if cart_lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        // Advisory: stock may still move before the debits below.
        let mut lines = Vec::with_capacity(cart_lines.len());

        for line in &cart_lines {
            let product = self.load_product(line.product_uuid).await?;

            if line.quantity > product.stock {
                return Err(OrdersServiceError::InsufficientStock {
                    product: product.uuid,
                    available: product.stock,
                });
            }

            lines.push(assemble_line(line, &product));
        }

        let tally: Tally = cart_lines.iter().map(CartLine::priced).collect();
        let totals = tally.totals();
        let charges = tally.charges();

        let total_quantity = u32::try_from(tally.quantity)
            .map_err(|_| OrdersServiceError::Storage(RepositoryError::InvalidData))?;

        let Checkout {
            shipping_address,
            billing_address,
            payment_method,
            payment_id,
            notes,
        } = checkout;

        let header = self
            .insert_header(NewOrder {
                uuid: OrderUuid::new(),
                order_number: String::new(),
                owner: owner.clone(),
                status: OrderStatus::Pending,
                payment_status: payment_method.initial_payment_status(),
                payment_method,
                payment_id,
                total_amount: totals.total_amount,
                discounted_total: charges.total,
                shipping_cost: charges.shipping_cost,
                tax: charges.tax,
                total_products: tally.lines,
                total_quantity,
                billing_address: billing_address.unwrap_or_else(|| shipping_address.clone()),
                shipping_address,
                notes,
                estimated_delivery: Timestamp::now() + DELIVERY_WINDOW,
            })
            .await?;

        let mut debited = Vec::with_capacity(lines.len());

        let created = match self.commit_lines(header.uuid, lines, &mut debited).await {
            Ok(created) => created,
            Err(error) => {
                warn!(order = %header.uuid, %error, "order failed, rolling back");

                self.roll_back_order(header.uuid, &debited).await;

                return Err(error);
            }
        };

        // The order stands even if the cart cannot be retired. Lines added
        // after the cart was read were not ordered and are left in place.
        for line in &cart_lines {
            if let Err(error) = self.cart_lines.delete_line(cart.uuid, line.uuid).await {
                error!(
                    cart = %cart.uuid,
                    line = %line.uuid,
                    %error,
                    "failed to remove ordered cart line"
                );
            }
        }

        if let Err(error) = self.carts.deactivate_cart(cart.uuid).await {
            error!(cart = %cart.uuid, %error, "failed to deactivate ordered cart");
        }

        info!(
            order = %header.uuid,
            order_number = %header.order_number,
            total = %header.discounted_total,
            "order placed"
        );

        Ok(Order {
            lines: created,
            ..header
        })
    }

    async fn get_order(&self, owner: &Owner, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let order = self.owned_order(owner, order).await?;

        self.with_lines(order).await
    }

    async fn list_orders(&self, owner: &Owner) -> Result<Vec<Order>, OrdersServiceError> {
        let orders = self.orders.list_orders(owner).await?;

        let mut listed = Vec::with_capacity(orders.len());

        for order in orders {
            listed.push(self.with_lines(order).await?);
        }

        Ok(listed)
    }

    async fn cancel_order(&self, owner: &Owner, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let order = self.owned_order(owner, order).await?;

        if !order.status.is_cancellable() {
            return Err(OrdersServiceError::InvalidTransition {
                status: order.status,
            });
        }

        let lines = self.order_lines.list_lines(order.uuid).await?;

        // Only the caller that wins the status change credits stock.
        let mut cancelled = self
            .transition(
                &order,
                StatusChange::new(OrderStatus::Cancelled, PaymentStatus::Refunded),
            )
            .await?;

        let mut credited = Vec::with_capacity(lines.len());

        for line in &lines {
            if let Err(error) = self.ledger.credit(line.product_uuid, line.quantity).await {
                warn!(order = %order.uuid, %error, "cancellation failed, rolling back");

                self.roll_back_cancel(&order, &credited).await;

                return Err(error.into());
            }

            credited.push((line.product_uuid, line.quantity));
        }

        info!(order = %order.uuid, lines = lines.len(), "order cancelled");

        cancelled.lines = lines;

        Ok(cancelled)
    }

    async fn set_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<Order, OrdersServiceError> {
        let order = self.orders.get_order(order).await?;

        if !self.policy.permits(order.status, update.status) {
            return Err(OrdersServiceError::InvalidTransition {
                status: order.status,
            });
        }

        let change = StatusChange {
            tracking_number: update.tracking_number,
            notes: update.notes,
            delivered_at: (update.status == OrderStatus::Delivered).then(Timestamp::now),
            ..StatusChange::new(update.status, order.payment_status)
        };

        let updated = self.transition(&order, change).await?;

        info!(order = %updated.uuid, from = %order.status, to = %updated.status, "order status set");

        self.with_lines(updated).await
    }

    async fn confirm_payment(
        &self,
        order: OrderUuid,
        payment_id: String,
    ) -> Result<Order, OrdersServiceError> {
        let order = self.orders.get_order(order).await?;

        if order.status.is_side_state() || order.payment_status != PaymentStatus::Pending {
            return Err(OrdersServiceError::InvalidTransition {
                status: order.status,
            });
        }

        let change = StatusChange {
            payment_id: Some(payment_id),
            ..StatusChange::new(order.status, PaymentStatus::Paid)
        };

        let updated = self.transition(&order, change).await?;

        info!(order = %updated.uuid, "payment confirmed");

        self.with_lines(updated).await
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turns the owner's active cart into an order.
    ///
    /// Stock is checked up front, then debited line by line. A debit that
    /// loses a race with another order fails with
    /// [`OrdersServiceError::StockRace`] after everything already written has
    /// been undone.
    async fn create_order(
        &self,
        owner: &Owner,
        checkout: Checkout,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieve a single order belonging to `owner`.
    async fn get_order(&self, owner: &Owner, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieves the owner's orders, newest first.
    async fn list_orders(&self, owner: &Owner) -> Result<Vec<Order>, OrdersServiceError>;

    /// Cancels an order that has not shipped and returns its units to stock.
    async fn cancel_order(&self, owner: &Owner, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Administrative status change, checked against the configured policy.
    /// Moving to delivered stamps the delivery time.
    async fn set_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<Order, OrdersServiceError>;

    /// Marks a pending payment as paid.
    async fn confirm_payment(
        &self,
        order: OrderUuid,
        payment_id: String,
    ) -> Result<Order, OrdersServiceError>;
}
