//! Errors

use salvo::http::StatusError;
use tracing::error;

use shopfront_app::domain::carts::CartsServiceError;

use crate::errors::rejected;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::OwnerRequired => {
            rejected(StatusError::bad_request(), "owner_required", &error)
        }
        CartsServiceError::NotFound => rejected(StatusError::not_found(), "cart_not_found", &error),
        CartsServiceError::LineNotFound => {
            rejected(StatusError::not_found(), "line_not_found", &error)
        }
        CartsServiceError::ProductNotFound(_) => {
            rejected(StatusError::not_found(), "product_not_found", &error)
        }
        CartsServiceError::InvalidQuantity => {
            rejected(StatusError::bad_request(), "invalid_quantity", &error)
        }
        CartsServiceError::InsufficientStock { .. } => {
            rejected(StatusError::bad_request(), "insufficient_stock", &error)
        }
        CartsServiceError::AlreadyExists => {
            rejected(StatusError::conflict(), "cart_exists", &error)
        }
        CartsServiceError::InvalidData => {
            rejected(StatusError::bad_request(), "invalid_cart", &error)
        }
        CartsServiceError::Storage(source) => {
            error!("carts storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use shopfront_app::domain::products::models::ProductUuid;

    use super::*;

    #[test]
    fn stock_shortfalls_are_bad_requests() {
        let error = into_status_error(CartsServiceError::InsufficientStock {
            product: ProductUuid::new(),
            available: 2,
        });

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "insufficient_stock");
        assert!(
            error
                .cause
                .as_ref()
                .is_some_and(|cause| cause.to_string().contains("2 available")),
            "expected cause to mention availability"
        );
    }

    #[test]
    fn missing_owner_is_a_bad_request() {
        let error = into_status_error(CartsServiceError::OwnerRequired);

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "owner_required");
    }
}
