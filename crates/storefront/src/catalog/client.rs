//! Catalog service client implementation.

use std::sync::Arc;

use moka::future::Cache;
use shopfront_core::{Catalog, Product};
use tracing::{debug, instrument};
use url::Url;

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use crate::config::CatalogConfig;

/// Characters of a response body kept in logs and errors.
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for the external catalog service.
///
/// Cheap to clone. When a cache TTL is configured, the last successful
/// product list is reused until it expires; failures are never cached.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint: config.url.clone(),
                cache,
            }),
        }
    }

    /// Fetch the product list.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that is not a JSON array of products.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<Arc<[Product]>, CatalogError> {
        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Products(products)) = cache.get(&CacheKey::Products).await
        {
            debug!(count = products.len(), "catalog cache hit");
            return Ok(products);
        }

        let products: Arc<[Product]> = self.request_products().await?.into();
        debug!(count = products.len(), "catalog fetched");

        if let Some(cache) = &self.inner.cache {
            cache
                .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
                .await;
        }

        Ok(products)
    }

    /// Fetch the product list into a page-session catalog.
    ///
    /// Failures are logged and yield an empty catalog; callers must not
    /// assume the catalog is ever non-empty.
    pub async fn load_catalog(&self) -> Catalog {
        match self.fetch_products().await {
            Ok(products) => Catalog::new(products.to_vec()),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching products");
                Catalog::default()
            }
        }
    }

    /// Drop any reused product list so the next page load refetches.
    pub async fn invalidate(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
            cache.run_pending_tasks().await;
        }
    }

    async fn request_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = excerpt(&response_text);
            tracing::error!(status = %status, body = %body, "Catalog service returned non-success status");
            return Err(CatalogError::Status { status, body });
        }

        serde_json::from_str::<Vec<Product>>(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&response_text),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::{Router, http::StatusCode, routing::get};

    use super::*;

    /// Serve `router` on an ephemeral port and return its `/products` URL.
    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/products")).unwrap()
    }

    const PRODUCTS: &str = r#"[
        {"id": 1, "title": "Backpack", "price": 10.0, "description": "d", "category": "bags", "image": "a.jpg"},
        {"id": 2, "title": "Mug", "price": 5.5, "description": "d", "category": "kitchen", "image": "b.jpg"}
    ]"#;

    #[tokio::test]
    async fn test_fetch_products_success() {
        let url = serve(Router::new().route("/products", get(|| async { PRODUCTS }))).await;
        let client = CatalogClient::new(&CatalogConfig::uncached(url));

        let products = client.fetch_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].title, "Mug");
    }

    #[tokio::test]
    async fn test_fetch_products_bad_status() {
        let url = serve(Router::new().route(
            "/products",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        ))
        .await;
        let client = CatalogClient::new(&CatalogConfig::uncached(url));

        let err = client.fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Status { status, .. } if status == StatusCode::BAD_GATEWAY));
    }

    #[tokio::test]
    async fn test_fetch_products_malformed_body() {
        let url = serve(Router::new().route("/products", get(|| async { "{\"oops\": true}" }))).await;
        let client = CatalogClient::new(&CatalogConfig::uncached(url));

        let err = client.fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_load_catalog_degrades_to_empty() {
        // Nothing listens on the discard port.
        let url = Url::parse("http://127.0.0.1:9/products").unwrap();
        let client = CatalogClient::new(&CatalogConfig::uncached(url));

        let catalog = client.load_catalog().await;
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_cache_reuses_successful_fetch() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let url = serve(Router::new().route(
            "/products",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    PRODUCTS
                }
            }),
        ))
        .await;
        let client = CatalogClient::new(&CatalogConfig {
            url,
            cache_ttl: Duration::from_secs(60),
        });

        client.fetch_products().await.unwrap();
        client.fetch_products().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        client.invalidate().await;
        client.fetch_products().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_uncached_fetches_every_time() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let url = serve(Router::new().route(
            "/products",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    PRODUCTS
                }
            }),
        ))
        .await;
        let client = CatalogClient::new(&CatalogConfig::uncached(url));

        client.fetch_products().await.unwrap();
        client.fetch_products().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
