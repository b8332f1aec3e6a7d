//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use shopfront_app::domain::{orders::OrdersServiceError, stock::StockLedgerError};

use crate::errors::rejected;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::OwnerRequired => {
            rejected(StatusError::bad_request(), "owner_required", &error)
        }
        OrdersServiceError::NotFound => {
            rejected(StatusError::not_found(), "order_not_found", &error)
        }
        OrdersServiceError::EmptyCart => rejected(StatusError::bad_request(), "empty_cart", &error),
        OrdersServiceError::ProductNotFound(_)
        | OrdersServiceError::Ledger(StockLedgerError::ProductNotFound(_)) => {
            rejected(StatusError::not_found(), "product_not_found", &error)
        }
        OrdersServiceError::InsufficientStock { .. } => {
            rejected(StatusError::bad_request(), "insufficient_stock", &error)
        }
        OrdersServiceError::StockRace { .. } => {
            rejected(StatusError::conflict(), "stock_race", &error)
        }
        OrdersServiceError::InvalidTransition { .. } => {
            rejected(StatusError::bad_request(), "invalid_transition", &error)
        }
        OrdersServiceError::DuplicateOrderNumber => {
            rejected(StatusError::conflict(), "duplicate_order_number", &error)
        }
        OrdersServiceError::Ledger(StockLedgerError::StockViolation { .. }) => {
            rejected(StatusError::conflict(), "stock_violation", &error)
        }
        OrdersServiceError::Ledger(StockLedgerError::Storage(source))
        | OrdersServiceError::Storage(source) => {
            error!("orders storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use shopfront_app::{
        domain::{orders::status::OrderStatus, products::models::ProductUuid},
        storage::RepositoryError,
    };

    use super::*;

    #[test]
    fn lost_races_are_distinct_from_missing_stock() {
        let product = ProductUuid::new();

        let race = into_status_error(OrdersServiceError::StockRace {
            product,
            available: 0,
        });
        let shortfall = into_status_error(OrdersServiceError::InsufficientStock {
            product,
            available: 0,
        });

        assert_eq!(race.code, StatusCode::CONFLICT);
        assert_eq!(race.brief, "stock_race");
        assert_eq!(shortfall.code, StatusCode::BAD_REQUEST);
        assert_eq!(shortfall.brief, "insufficient_stock");
    }

    #[test]
    fn invalid_transitions_name_the_current_status() {
        let error = into_status_error(OrdersServiceError::InvalidTransition {
            status: OrderStatus::Shipped,
        });

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert!(
            error
                .cause
                .as_ref()
                .is_some_and(|cause| cause.to_string().contains("shipped")),
            "expected cause to name the status"
        );
    }

    #[test]
    fn storage_failures_hide_their_cause() {
        let error = into_status_error(OrdersServiceError::Storage(RepositoryError::InvalidData));

        assert_eq!(error.code, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.cause.is_none(), "expected no cause on a 500");
    }
}
