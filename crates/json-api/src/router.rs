//! App Router

use salvo::Router;

use crate::{auth, carts, orders, products};

pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler)
                        .push(Router::with_path("restock").post(products::restock::handler)),
                ),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(Router::with_path("merge").post(carts::merge::handler))
                .push(
                    Router::with_path("lines")
                        .post(carts::lines::create::handler)
                        .push(
                            Router::with_path("{line}")
                                .put(carts::lines::update::handler)
                                .delete(carts::lines::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").post(orders::cancel::handler))
                        .push(Router::with_path("status").put(orders::status::handler))
                        .push(Router::with_path("payment").post(orders::payment::handler)),
                ),
        )
}
