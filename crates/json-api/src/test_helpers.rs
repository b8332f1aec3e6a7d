//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use shopfront_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartLine, CartLineUuid, CartUuid},
        },
        orders::{
            MockOrdersService,
            models::{Address, Order, OrderUuid, PaymentMethod},
            status::{OrderStatus, PaymentStatus},
        },
        owners::{Owner, SessionId, UserUuid},
        products::{
            MockProductsService,
            models::{Product, ProductUuid},
        },
    },
};

use crate::{
    auth::Identity,
    state::{State, StorageBackend},
};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_SESSION: &str = "guest-1";

/// Mocked services. Any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::new(
            AppContext {
                products: Arc::new(self.products),
                carts: Arc::new(self.carts),
                orders: Arc::new(self.orders),
                auth: Arc::new(self.auth),
            },
            StorageBackend::Memory,
        )
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

pub(crate) fn anonymous() -> Identity {
    Identity::default()
}

pub(crate) fn guest() -> Identity {
    Identity {
        principal: None,
        session: SessionId::parse(TEST_SESSION).ok(),
    }
}

pub(crate) fn customer() -> Identity {
    Identity {
        principal: Some(Principal {
            user: TEST_USER_UUID,
            is_admin: false,
        }),
        session: None,
    }
}

pub(crate) fn admin() -> Identity {
    Identity {
        principal: Some(Principal {
            user: TEST_USER_UUID,
            is_admin: true,
        }),
        session: None,
    }
}

pub(crate) fn guest_owner() -> Owner {
    Owner::Session(SessionId::parse(TEST_SESSION).expect("valid session"))
}

pub(crate) fn customer_owner() -> Owner {
    Owner::User(TEST_USER_UUID)
}

/// A service that sees every request as coming from `identity`.
pub(crate) fn service_as(identity: Identity, mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject(identity))
            .push(route),
    )
}

pub(crate) fn money(value: &str) -> Decimal {
    value.parse().unwrap_or_default()
}

pub(crate) fn make_product(uuid: ProductUuid) -> Product {
    Product {
        uuid,
        title: "Desk Lamp".to_string(),
        description: "A lamp".to_string(),
        brand: Some("Lumen".to_string()),
        thumbnail: None,
        category: "lighting".to_string(),
        price: money("40.00"),
        discount_percentage: money("25"),
        stock: 7,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_line(cart: CartUuid, product: ProductUuid, quantity: u32) -> CartLine {
    CartLine {
        uuid: CartLineUuid::new(),
        cart_uuid: cart,
        product_uuid: product,
        quantity,
        price_at_time: money("40.00"),
        discount_at_time: money("25"),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(owner: Owner, lines: Vec<CartLine>) -> Cart {
    Cart {
        uuid: CartUuid::new(),
        owner,
        is_active: true,
        lines,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address() -> Address {
    Address {
        full_name: "Ada Lovelace".to_string(),
        line1: "12 Analytical Row".to_string(),
        line2: None,
        city: "London".to_string(),
        state: None,
        postal_code: "N1 9GU".to_string(),
        country: "GB".to_string(),
        phone: None,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, owner: Owner) -> Order {
    Order {
        uuid,
        order_number: "ORD-1700000000000-ABC123".to_string(),
        owner,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_method: PaymentMethod::CashOnDelivery,
        payment_id: None,
        total_amount: money("40.00"),
        discounted_total: money("47.40"),
        shipping_cost: money("15.00"),
        tax: money("2.40"),
        total_products: 1,
        total_quantity: 1,
        shipping_address: make_address(),
        billing_address: make_address(),
        tracking_number: None,
        notes: None,
        estimated_delivery: Timestamp::UNIX_EPOCH,
        delivered_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        lines: Vec::new(),
    }
}
