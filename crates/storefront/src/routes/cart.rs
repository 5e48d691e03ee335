//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each request opens the visitor's cart, applies at most one action, and
//! renders the affected fragment from the resulting cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use shopfront_core::{CartAction, ProductId};
use tracing::instrument;

use super::{CART_UPDATED_EVENT, is_htmx};
use crate::middleware::Visitor;
use crate::page::PageController;
use crate::state::AppState;
use crate::storage::VisitorStorage;
use crate::views::{CartBadgeView, CartView};

/// Form posted by every cart control.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub badge: CartBadgeView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub badge: CartBadgeView,
}

/// Display cart page.
#[instrument(skip(visitor))]
pub async fn show(visitor: Visitor) -> impl IntoResponse {
    let page = PageController::cart_page(visitor.storage);

    CartShowTemplate {
        cart: page.cart_table(),
        badge: page.cart_badge(),
    }
}

/// Add item to cart (HTMX).
///
/// The product must be in the current catalog; unknown ids leave the cart
/// unchanged. Returns the refreshed cart count badge.
#[instrument(skip(state, visitor, headers))]
pub async fn add(
    State(state): State<AppState>,
    visitor: Visitor,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Response {
    let catalog = state.catalog().load_catalog().await;
    let mut page = PageController::catalog_page(visitor.storage, catalog);
    page.dispatch(CartAction::Add(form.product_id));

    if !is_htmx(&headers) {
        return Redirect::to("/").into_response();
    }

    CartCountTemplate {
        badge: page.cart_badge(),
    }
    .into_response()
}

/// Raise a line's quantity by one (HTMX).
#[instrument(skip(visitor, headers))]
pub async fn increment(
    visitor: Visitor,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Response {
    update_cart(visitor.storage, &headers, CartAction::Increment(form.product_id))
}

/// Lower a line's quantity by one, removing it at one (HTMX).
#[instrument(skip(visitor, headers))]
pub async fn decrement(
    visitor: Visitor,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Response {
    update_cart(visitor.storage, &headers, CartAction::Decrement(form.product_id))
}

/// Remove a line (HTMX).
#[instrument(skip(visitor, headers))]
pub async fn remove(
    visitor: Visitor,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Response {
    update_cart(visitor.storage, &headers, CartAction::Remove(form.product_id))
}

/// Get cart count badge (HTMX).
#[instrument(skip(visitor))]
pub async fn count(visitor: Visitor) -> impl IntoResponse {
    CartCountTemplate {
        badge: PageController::cart_page(visitor.storage).cart_badge(),
    }
}

/// Acknowledge a checkout request.
///
/// There is no order flow; the cart is left untouched.
#[instrument(skip(visitor))]
pub async fn checkout(visitor: Visitor) -> StatusCode {
    let page = PageController::cart_page(visitor.storage);
    tracing::info!(
        items = page.cart_badge().count,
        subtotal = %page.cart().subtotal(),
        "checkout requested"
    );
    StatusCode::NO_CONTENT
}

/// Apply a cart page action and render the cart table.
fn update_cart(storage: VisitorStorage, headers: &HeaderMap, action: CartAction) -> Response {
    let mut page = PageController::cart_page(storage);
    let changed = page.dispatch(action);

    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }

    let fragment = CartItemsTemplate {
        cart: page.cart_table(),
    };

    if changed {
        // Let the badge refresh itself
        (AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]), fragment).into_response()
    } else {
        fragment.into_response()
    }
}
