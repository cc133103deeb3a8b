//! App Router

use salvo::Router;

use crate::{addresses, auth, carts, coupons, orders, products, reviews, wishlist};

/// Every route that needs a signed-in user. Routes under `/admin` also need the admin role.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(Router::with_path("validate").post(carts::validate::handler))
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(Router::with_path("coupons/validate").post(coupons::validate::handler))
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").post(orders::cancel::handler))
                        .push(Router::with_path("history").get(orders::history::handler))
                        .push(
                            Router::with_path("payment")
                                .post(orders::payment::handler)
                                .push(Router::with_path("verify").post(orders::verify::handler)),
                        ),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .push(
                            Router::with_path("reviews")
                                .get(reviews::index::handler)
                                .post(reviews::create::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("reviews/{review}")
                .push(Router::with_path("helpful").post(reviews::helpful::handler))
                .push(Router::with_path("report").post(reviews::report::handler)),
        )
        .push(
            Router::with_path("addresses")
                .get(addresses::index::handler)
                .post(addresses::create::handler)
                .push(Router::with_path("{address}").delete(addresses::delete::handler)),
        )
        .push(
            Router::with_path("wishlist")
                .get(wishlist::index::handler)
                .push(
                    Router::with_path("{product}")
                        .put(wishlist::create::handler)
                        .delete(wishlist::delete::handler),
                ),
        )
        .push(admin_router())
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .hoop(auth::middleware::require_admin)
        .push(
            Router::with_path("orders")
                .get(orders::admin_index::handler)
                .push(Router::with_path("{order}/status").put(orders::status::handler)),
        )
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .push(Router::with_path("variants").post(products::variants::handler)),
                ),
        )
        .push(
            Router::with_path("coupons")
                .get(coupons::index::handler)
                .post(coupons::create::handler)
                .push(Router::with_path("{coupon}").delete(coupons::delete::handler)),
        )
        .push(
            Router::with_path("reviews/{review}/moderation").put(reviews::moderate::handler),
        )
}
