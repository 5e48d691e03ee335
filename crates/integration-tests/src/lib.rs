//! Integration tests for shopfront.
//!
//! Each test boots a stub catalog service and a storefront on ephemeral
//! ports and drives the storefront over HTTP with a cookie-keeping client,
//! the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use reqwest::Client;
use serde_json::{Value, json};
use shopfront::config::{CatalogConfig, StorageConfig, StorefrontConfig};
use shopfront::state::AppState;
use url::Url;

/// Products served by the stub catalog.
#[must_use]
pub fn sample_products() -> Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use and walks in the forest. Stash your laptop (up to 15 inches) in the padded sleeve, your everyday",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg"
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style, contrast raglan long sleeve.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg"
        },
        {
            "id": 5,
            "title": "John Hardy Women's Legends Naga Bracelet",
            "price": 695,
            "description": "From our Legends Collection, the Naga was inspired by the mythical water dragon.",
            "category": "jewelery",
            "image": "https://fakestoreapi.com/img/71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg"
        }
    ])
}

/// A stub catalog service that can be taken down mid-test.
#[derive(Clone)]
pub struct CatalogStub {
    pub url: Url,
    hits: Arc<AtomicUsize>,
    down: Arc<AtomicBool>,
}

impl CatalogStub {
    /// Serve `products` at `/products` on an ephemeral port.
    pub async fn start(products: Value) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let down = Arc::new(AtomicBool::new(false));
        let body = products.to_string();

        let (counter, flag) = (Arc::clone(&hits), Arc::clone(&down));
        let router = Router::new().route(
            "/products",
            get(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                let response = if flag.load(Ordering::SeqCst) {
                    (StatusCode::SERVICE_UNAVAILABLE, "catalog offline".to_string())
                } else {
                    (StatusCode::OK, body.clone())
                };
                async move { response }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{addr}/products")).unwrap(),
            hits,
            down,
        }
    }

    /// Make every following request fail with 503.
    pub fn take_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }

    /// Number of product list requests served.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A running storefront and a browser-like client for it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub catalog: CatalogStub,
}

impl TestContext {
    /// Boot a storefront backed by a stub serving [`sample_products`].
    pub async fn new() -> Self {
        Self::with_products(sample_products()).await
    }

    /// Boot a storefront backed by a stub serving `products`.
    pub async fn with_products(products: Value) -> Self {
        let catalog = CatalogStub::start(products).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost".to_string(),
            // Fetch on every page load so catalog outages show up immediately
            catalog: CatalogConfig::uncached(catalog.url.clone()),
            storage: StorageConfig {
                idle_expiry: Duration::from_secs(60 * 60),
                max_entries: 1_000,
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        let app = shopfront::app(AppState::new(config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: Self::browser(),
            base_url: format!("http://{addr}"),
            catalog,
        }
    }

    /// A fresh client with its own cookie jar, i.e. another browser.
    #[must_use]
    pub fn browser() -> Client {
        Client::builder().cookie_store(true).build().unwrap()
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page and return its status and body.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    /// POST a cart control the way HTMX does.
    pub async fn htmx_post(&self, path: &str, product_id: i32) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(&[("product_id", product_id.to_string())])
            .send()
            .await
            .unwrap()
    }

    /// Click "Add to Cart" for `product_id` and return the badge fragment.
    pub async fn add_to_cart(&self, product_id: i32) -> String {
        self.htmx_post("/cart/add", product_id)
            .await
            .text()
            .await
            .unwrap()
    }

    /// Current badge count as rendered by `/cart/count`.
    pub async fn badge_count(&self) -> u64 {
        let (_, body) = self.get("/cart/count").await;
        parse_badge(&body).unwrap()
    }
}

/// Extract `N` from a rendered ` (N)` cart badge.
#[must_use]
pub fn parse_badge(html: &str) -> Option<u64> {
    let rest = html.get(html.find(r#"id="cart-count""#)?..)?;
    let digits = rest.get(rest.find("> (")? + 3..)?;
    let close = digits.find(")</span>")?;
    digits.get(..close)?.parse().ok()
}
