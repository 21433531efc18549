//! Session middleware configuration for admin.
//!
//! Sessions are in-memory and only carry the browser key that ties a
//! visitor to their page browsers (SameSite=Strict, 30 minute idle expiry).

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::error::AppError;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "shopdesk_session";

/// Session key holding the browser key.
pub const BROWSER_KEY: &str = "browser_key";

/// Session expiry time in seconds (matches the browser cache idle timeout).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}

/// Extractor for the visitor's browser key.
///
/// A key is generated and stored in the session on first use.
///
/// ```rust,ignore
/// async fn handler(BrowserKey(key): BrowserKey, State(state): State<AppState>) {
///     let browser = state.customers().try_lock(key).await?;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserKey(pub Uuid);

/// Rejection when the session layer is missing or the store fails.
pub struct BrowserKeyRejection(AppError);

impl IntoResponse for BrowserKeyRejection {
    fn into_response(self) -> Response {
        self.0.into_response()
    }
}

impl<S> FromRequestParts<S> for BrowserKey
where
    S: Send + Sync,
{
    type Rejection = BrowserKeyRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or_else(|| {
            BrowserKeyRejection(AppError::Internal("session layer missing".to_string()))
        })?;

        let existing: Option<Uuid> = session
            .get(BROWSER_KEY)
            .await
            .map_err(|e| BrowserKeyRejection(AppError::Internal(e.to_string())))?;

        if let Some(key) = existing {
            return Ok(Self(key));
        }

        let key = Uuid::new_v4();
        session
            .insert(BROWSER_KEY, key)
            .await
            .map_err(|e| BrowserKeyRejection(AppError::Internal(e.to_string())))?;
        tracing::debug!(browser_key = %key, "Started browser session");

        Ok(Self(key))
    }
}
