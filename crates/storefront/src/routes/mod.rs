//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Catalog page (?category= filters the grid)
//! GET  /products          - Product grid fragment (HTMX)
//!
//! # Cart (HTMX fragments)
//! GET  /cart              - Cart page
//! POST /cart/add          - Add to cart (returns cart_count fragment)
//! POST /cart/increment    - Raise quantity (returns cart_items fragment)
//! POST /cart/decrement    - Lower quantity (returns cart_items fragment)
//! POST /cart/remove       - Remove line (returns cart_items fragment)
//! GET  /cart/count        - Cart count badge (fragment)
//!
//! # Checkout
//! POST /checkout          - Acknowledged, no effect
//! ```
//!
//! Mutations posted without the `HX-Request` header redirect back to the
//! page they came from.

pub mod cart;
pub mod home;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::state::AppState;

/// Header set by HTMX on every request it issues.
const HX_REQUEST_HEADER: &str = "hx-request";

/// Event fired after the cart changes; the badge listens for it.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/products", get(home::product_grid))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST_HEADER)
        .is_some_and(|value| value.as_bytes() == b"true")
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));

        headers.insert(HX_REQUEST_HEADER, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));

        headers.insert(HX_REQUEST_HEADER, HeaderValue::from_static("false"));
        assert!(!is_htmx(&headers));
    }
}
