//! Outcomes of single-record update mutations.
//!
//! Shopify reports business-rule violations as `userErrors` inside a
//! successful GraphQL response. An update is therefore either a success
//! carrying the echoed record, or a failure that is a validation problem
//! (show the message to the user) or a transport problem (the request never
//! produced a usable answer).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A business-rule violation reported by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the input field that caused the error, if any.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable message from Shopify.
    pub message: String,
}

impl UserError {
    /// Create a user error without a field path.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Why an update failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The input was rejected, locally or by Shopify's user errors.
    Validation,
    /// The request failed or returned nothing usable.
    Transport,
}

/// A failed update with the message to surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct UpdateFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Message shown to the user.
    pub message: String,
}

impl UpdateFailure {
    /// A validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Validation,
            message: message.into(),
        }
    }

    /// A transport failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    /// Classify a mutation payload's user errors.
    ///
    /// Returns a validation failure carrying the first error's message, or
    /// `None` when the list is empty. Later errors are not surfaced.
    #[must_use]
    pub fn from_user_errors(errors: &[UserError]) -> Option<Self> {
        errors
            .first()
            .map(|first| Self::validation(first.message.clone()))
    }
}

/// Result of an update: the echoed record or a classified failure.
pub type UpdateResult<T> = Result<T, UpdateFailure>;
