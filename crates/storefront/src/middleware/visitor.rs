//! Visitor extractor.
//!
//! Resolves the request's session to the browser's visitor id, issuing a new
//! id on first contact, and hands the handler that visitor's storage.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{VisitorId, session_keys};
use crate::state::AppState;
use crate::storage::VisitorStorage;

/// The browser making the request, with its cart storage.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(visitor: Visitor) -> impl IntoResponse {
///     let store = CartStore::open(visitor.storage);
///     format!("{} items", store.total_item_count())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Visitor {
    pub storage: VisitorStorage,
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = match session.get::<VisitorId>(session_keys::VISITOR_ID).await? {
            Some(id) => id,
            None => {
                let id = VisitorId::generate();
                session.insert(session_keys::VISITOR_ID, id).await?;
                tracing::debug!(visitor = %id, "new visitor");
                id
            }
        };

        tracing::Span::current().record("visitor", tracing::field::display(id));

        Ok(Self {
            storage: state.storage().for_visitor(id),
        })
    }
}
