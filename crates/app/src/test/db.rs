//! Postgres-backed test databases.
//!
//! A single container is shared by every test; each [`TestDb`] gets its own
//! freshly migrated database inside it, dropped again when the handle goes away.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

use crate::database::{self, Db};

const USER: &str = "shopfront_test";
const PASSWORD: &str = "shopfront_test_password";

static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(USER)
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("Failed to drop test database '{name}': {error}");
            }
        }
    });

    sender
}

async fn server_url(database: &str) -> String {
    let container = POSTGRES_CONTAINER
        .get_or_init(init_postgres_container)
        .await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}")
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    let mut conn = PgConnection::connect(&server_url("postgres").await).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\""))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// An isolated, migrated database.
#[derive(Debug)]
pub(crate) struct TestDb {
    pub db: Db,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub(crate) async fn new() -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        // Generated names are always valid identifiers.
        let name = format!("shopfront_test_{}", Uuid::now_v7().simple());

        let mut conn = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let pool = PgPool::connect(&server_url(&name).await)
            .await
            .expect("Failed to create pool for database");

        database::migrate(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self {
            db: Db::new(pool),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        auth::{AuthRepository, NewUserToken, UserTokenUuid, hash_token},
        domain::{
            carts::{
                models::{CartLineUuid, CartUuid, NewCart, NewCartLine},
                repositories::{CartLinesRepository, CartsRepository},
            },
            orders::{
                models::{NewOrder, OrderUuid, PaymentMethod, StatusChange},
                repositories::OrdersRepository,
                status::{OrderStatus, PaymentStatus},
            },
            owners::{Owner, UserUuid},
            products::repository::{ProductsRepository, StockAdjustment},
        },
        storage::{Repositories, RepositoryError},
        test::helpers::{address, new_product, session_owner},
    };

    use super::*;

    fn new_order(owner: Owner, number: &str) -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            order_number: number.to_string(),
            owner,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
            payment_id: None,
            total_amount: "50.00".parse().expect("valid amount"),
            discounted_total: "69.00".parse().expect("valid amount"),
            shipping_cost: "15.00".parse().expect("valid amount"),
            tax: "4.00".parse().expect("valid amount"),
            total_products: 1,
            total_quantity: 2,
            shipping_address: address(),
            billing_address: address(),
            notes: None,
            estimated_delivery: jiff::Timestamp::now(),
        }
    }

    #[tokio::test]
    #[ignore = "needs a container runtime"]
    async fn guarded_stock_update_rejects_overdraw() -> TestResult {
        let test_db = TestDb::new().await;
        let repositories = Repositories::postgres(&test_db.db);

        let product = repositories
            .products
            .create_product(new_product("Lamp", "10.00", "0", 3))
            .await?;

        let rejected = repositories.products.adjust_stock(product.uuid, -4).await?;
        let applied = repositories.products.adjust_stock(product.uuid, -3).await?;

        assert_eq!(rejected, StockAdjustment::Rejected { available: 3 });
        assert_eq!(applied, StockAdjustment::Applied { stock: 0 });

        Ok(())
    }

    #[tokio::test]
    #[ignore = "needs a container runtime"]
    async fn second_active_cart_is_rejected() -> TestResult {
        let test_db = TestDb::new().await;
        let repositories = Repositories::postgres(&test_db.db);
        let owner = session_owner("guest-1");

        repositories
            .carts
            .create_cart(NewCart {
                uuid: CartUuid::new(),
                owner: owner.clone(),
            })
            .await?;

        let result = repositories
            .carts
            .create_cart(NewCart {
                uuid: CartUuid::new(),
                owner,
            })
            .await;

        assert!(
            matches!(result, Err(RepositoryError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "needs a container runtime"]
    async fn taking_lines_empties_the_cart() -> TestResult {
        let test_db = TestDb::new().await;
        let repositories = Repositories::postgres(&test_db.db);

        let product = repositories
            .products
            .create_product(new_product("Mug", "5.00", "0", 9))
            .await?;

        let cart = repositories
            .carts
            .create_cart(NewCart {
                uuid: CartUuid::new(),
                owner: session_owner("guest-1"),
            })
            .await?;

        repositories
            .cart_lines
            .create_line(
                cart.uuid,
                NewCartLine {
                    uuid: CartLineUuid::new(),
                    product_uuid: product.uuid,
                    quantity: 2,
                    price_at_time: product.price,
                    discount_at_time: product.discount_percentage,
                },
            )
            .await?;

        let taken = repositories.cart_lines.take_lines(cart.uuid).await?;
        let again = repositories.cart_lines.take_lines(cart.uuid).await?;

        assert_eq!(taken.len(), 1);
        assert!(again.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "needs a container runtime"]
    async fn status_update_only_applies_from_expected_status() -> TestResult {
        let test_db = TestDb::new().await;
        let repositories = Repositories::postgres(&test_db.db);

        let order = repositories
            .orders
            .create_order(new_order(session_owner("guest-1"), "ORD-1-AAAAAA"))
            .await?;

        let cancelled = repositories
            .orders
            .update_status(
                order.uuid,
                OrderStatus::Pending,
                StatusChange::new(OrderStatus::Cancelled, PaymentStatus::Refunded),
            )
            .await?;

        let stale = repositories
            .orders
            .update_status(
                order.uuid,
                OrderStatus::Pending,
                StatusChange::new(OrderStatus::Cancelled, PaymentStatus::Refunded),
            )
            .await?;

        assert_eq!(cancelled.map(|o| o.status), Some(OrderStatus::Cancelled));
        assert!(stale.is_none());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "needs a container runtime"]
    async fn duplicate_order_number_is_rejected() -> TestResult {
        let test_db = TestDb::new().await;
        let repositories = Repositories::postgres(&test_db.db);

        repositories
            .orders
            .create_order(new_order(session_owner("guest-1"), "ORD-1-AAAAAA"))
            .await?;

        let result = repositories
            .orders
            .create_order(new_order(session_owner("guest-2"), "ORD-1-AAAAAA"))
            .await;

        assert!(
            matches!(result, Err(RepositoryError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "needs a container runtime"]
    async fn revoked_tokens_are_not_found() -> TestResult {
        let test_db = TestDb::new().await;
        let repositories = Repositories::postgres(&test_db.db);

        let token = repositories
            .auth
            .create_token(NewUserToken {
                uuid: UserTokenUuid::new(),
                user_uuid: UserUuid::new(),
                is_admin: false,
                token_hash: hash_token("sf_test"),
            })
            .await?;

        assert!(
            repositories
                .auth
                .find_active_token(&hash_token("sf_test"))
                .await?
                .is_some()
        );

        repositories.auth.revoke_token(token.uuid).await?;

        assert!(
            repositories
                .auth
                .find_active_token(&hash_token("sf_test"))
                .await?
                .is_none()
        );

        Ok(())
    }
}
