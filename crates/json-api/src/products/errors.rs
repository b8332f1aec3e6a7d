//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use shopfront_app::domain::{products::ProductsServiceError, stock::StockLedgerError};

use crate::errors::rejected;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::AlreadyExists => {
            rejected(StatusError::conflict(), "product_exists", &error)
        }
        ProductsServiceError::NotFound
        | ProductsServiceError::Stock(StockLedgerError::ProductNotFound(_)) => {
            rejected(StatusError::not_found(), "product_not_found", &error)
        }
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => {
            rejected(StatusError::bad_request(), "invalid_product", &error)
        }
        ProductsServiceError::NegativePrice => {
            rejected(StatusError::bad_request(), "negative_price", &error)
        }
        ProductsServiceError::InvalidDiscount => {
            rejected(StatusError::bad_request(), "invalid_discount", &error)
        }
        ProductsServiceError::TooPrecise => {
            rejected(StatusError::bad_request(), "too_precise", &error)
        }
        ProductsServiceError::InvalidQuantity => {
            rejected(StatusError::bad_request(), "invalid_quantity", &error)
        }
        ProductsServiceError::Stock(StockLedgerError::StockViolation { .. }) => {
            rejected(StatusError::conflict(), "stock_violation", &error)
        }
        ProductsServiceError::Stock(StockLedgerError::Storage(source))
        | ProductsServiceError::Storage(source) => {
            error!("products storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
