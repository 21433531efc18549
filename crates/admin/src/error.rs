//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use shopdesk_core::{DirectionError, FailureKind, NavigationError, UpdateFailure};
use thiserror::Error;

use crate::services::{BrowseError, BrowserBusy};
use crate::shopify::LoadError;

/// Application-level error type for the admin panel.
///
/// Every variant renders as `{"error": message}` with a matching status.
#[derive(Debug, Error)]
pub enum AppError {
    /// Loading a page from Shopify failed.
    #[error("{0}")]
    Load(#[from] LoadError),

    /// An update was rejected or could not be delivered.
    #[error("{0}")]
    Update(#[from] UpdateFailure),

    /// The same navigation or edit is already in flight.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BrowseError> for AppError {
    fn from(err: BrowseError) -> Self {
        match err {
            BrowseError::Busy(busy) => busy.into(),
            BrowseError::Load(load) => Self::Load(load),
        }
    }
}

impl From<NavigationError> for AppError {
    fn from(err: NavigationError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<BrowserBusy> for AppError {
    fn from(err: BrowserBusy) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<DirectionError> for AppError {
    fn from(err: DirectionError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Load(_) => StatusCode::BAD_GATEWAY,
            Self::Update(failure) => match failure.kind {
                FailureKind::Validation => StatusCode::BAD_REQUEST,
                FailureKind::Transport => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn is_server_fault(&self) -> bool {
        match self {
            Self::Load(_) | Self::Internal(_) => true,
            Self::Update(failure) => matches!(failure.kind, FailureKind::Transport),
            Self::Conflict(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Load(_) => "Failed to load data from Shopify".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Update(failure) => match failure.kind {
                FailureKind::Validation => failure.message.clone(),
                FailureKind::Transport => "Failed to update Shopify".to_string(),
            },
            Self::Conflict(_) | Self::BadRequest(_) => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
