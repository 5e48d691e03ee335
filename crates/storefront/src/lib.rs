//! Shopfront storefront library.
//!
//! Serves the catalog and cart pages, keeping each visitor's cart in
//! visitor-scoped storage. This crate provides the storefront as a library
//! so the router can be tested and embedded; `main.rs` only adds process
//! setup (configuration, tracing, Sentry) around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod page;
pub mod routes;
pub mod state;
pub mod storage;
pub mod views;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::state::AppState;

/// Directory of static assets, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the storefront router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        visitor = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. The catalog service is not
/// consulted; the storefront serves an empty grid when it is down.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::{CatalogConfig, StorageConfig, StorefrontConfig};

    const PRODUCTS: &str = r#"[
        {"id": 1, "title": "Fjallraven - Foldsack No. 1 Backpack", "price": 109.95, "description": "Your perfect pack for everyday use and walks in the forest.", "category": "men's clothing", "image": "https://img.example/1.jpg"},
        {"id": 2, "title": "Mug", "price": 6.95, "description": "Holds coffee.", "category": "kitchen", "image": "https://img.example/2.jpg"}
    ]"#;

    async fn catalog_url() -> Url {
        let router = Router::new().route("/products", get(|| async { PRODUCTS }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/products")).unwrap()
    }

    fn test_app(catalog: Url) -> Router {
        app(AppState::new(StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost".to_string(),
            catalog: CatalogConfig {
                url: catalog,
                cache_ttl: Duration::from_secs(60),
            },
            storage: StorageConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn session_cookie(response: &Response) -> String {
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
        set_cookie
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    fn get_request(uri: &str, cookie: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn htmx_post(uri: &str, cookie: &str, product_id: i32) -> Request<Body> {
        Request::post(uri)
            .header(header::COOKIE, cookie)
            .header("hx-request", "true")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("product_id={product_id}")))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(catalog_url().await);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_catalog_page_renders_cards() {
        let app = test_app(catalog_url().await);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains("Fjallraven - Fo..."));
        assert!(body.contains("$109.95"));
        assert!(body.contains(r#"id="cart-count""#));
        assert!(body.contains(" (0)</span>"));
    }

    #[tokio::test]
    async fn test_rerender_then_single_add() {
        let app = test_app(catalog_url().await);

        let first = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = session_cookie(&first);

        let second = app.clone().oneshot(get_request("/", &cookie)).await.unwrap();
        let body = body_text(second).await;
        assert_eq!(body.matches(r#"id="add-to-cart-1""#).count(), 1);
        assert_eq!(body.matches(r#"id="add-to-cart-2""#).count(), 1);

        let added = app
            .clone()
            .oneshot(htmx_post("/cart/add", &cookie, 1))
            .await
            .unwrap();
        assert_eq!(added.status(), StatusCode::OK);
        assert!(body_text(added).await.contains(" (1)</span>"));

        let cart = app.oneshot(get_request("/cart", &cookie)).await.unwrap();
        let body = body_text(cart).await;
        assert!(body.contains(r#"<span class="quantity">1</span>"#));
        assert!(body.contains("$109.95"));
    }

    #[tokio::test]
    async fn test_category_fragment() {
        let app = test_app(catalog_url().await);
        let response = app
            .oneshot(
                Request::get("/products?category=kitchen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_text(response).await;
        assert!(body.contains(r#"id="add-to-cart-2""#));
        assert!(!body.contains(r#"id="add-to-cart-1""#));
        assert!(!body.contains("<html"));
    }

    #[tokio::test]
    async fn test_cart_mutation_triggers_badge_refresh() {
        let app = test_app(catalog_url().await);

        let first = app
            .clone()
            .oneshot(Request::get("/cart/count").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = session_cookie(&first);

        app.clone()
            .oneshot(htmx_post("/cart/add", &cookie, 2))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(htmx_post("/cart/increment", &cookie, 2))
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("HX-Trigger").unwrap(),
            routes::CART_UPDATED_EVENT
        );
        let body = body_text(response).await;
        assert!(body.contains("$13.90"));

        // Unknown line: nothing changes, nothing to refresh
        let response = app
            .oneshot(htmx_post("/cart/remove", &cookie, 99))
            .await
            .unwrap();
        assert!(response.headers().get("HX-Trigger").is_none());
    }

    #[tokio::test]
    async fn test_add_without_htmx_redirects() {
        let app = test_app(catalog_url().await);
        let response = app
            .oneshot(
                Request::post("/cart/add")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("product_id=1"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_checkout_is_acknowledged() {
        let app = test_app(catalog_url().await);
        let response = app
            .oneshot(Request::post("/checkout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
