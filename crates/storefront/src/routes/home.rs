//! Catalog page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use shopfront_core::CategoryFilter;
use tracing::instrument;

use crate::middleware::Visitor;
use crate::page::PageController;
use crate::state::AppState;
use crate::views::{CartBadgeView, ProductGridView};

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

impl CatalogQuery {
    fn filter(&self) -> CategoryFilter {
        CategoryFilter::from_query(self.category.as_deref())
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub grid: ProductGridView,
    pub badge: CartBadgeView,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: ProductGridView,
}

/// Display the catalog page.
#[instrument(skip(state, visitor))]
pub async fn index(
    State(state): State<AppState>,
    visitor: Visitor,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let catalog = state.catalog().load_catalog().await;
    let page = PageController::catalog_page(visitor.storage, catalog);

    HomeTemplate {
        grid: page.product_grid(&query.filter()),
        badge: page.cart_badge(),
    }
}

/// Re-render the product grid for a category (HTMX).
#[instrument(skip(state))]
pub async fn product_grid(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let catalog = state.catalog().load_catalog().await;

    ProductGridTemplate {
        grid: ProductGridView::render(&catalog, &query.filter()),
    }
}
