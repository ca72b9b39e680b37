//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ClientError` type for operations that span the API
//! and local storage. Data-loading failures are captured to Sentry and turned
//! into a short, generic message for display; telemetry failures never reach
//! this type (see [`crate::telemetry`]).

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Input rejected before reaching a store or the backend.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found locally.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// What the failed operation was doing, for the generic inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadProducts,
    LoadFeed,
    LoadCart,
    PlaceOrder,
    LoadOrders,
    SaveCatalogue,
    SaveLocalState,
}

impl Action {
    const fn failure_message(self) -> &'static str {
        match self {
            Self::LoadProducts => "failed to load products",
            Self::LoadFeed => "failed to load feed",
            Self::LoadCart => "failed to load cart",
            Self::PlaceOrder => "failed to place order",
            Self::LoadOrders => "failed to load orders",
            Self::SaveCatalogue => "failed to save product",
            Self::SaveLocalState => "failed to save your changes",
        }
    }
}

impl ClientError {
    /// Message safe to show the user.
    ///
    /// Transport and server details are never exposed; input errors are,
    /// since the user can act on them.
    #[must_use]
    pub fn user_message(&self, action: Action) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Api(ApiError::NotFound(_)) => "not found".to_string(),
            Self::Config(_) => "client is misconfigured".to_string(),
            Self::Api(_) | Self::Storage(_) => action.failure_message().to_string(),
        }
    }

    /// Whether this error should be reported to Sentry.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        !matches!(
            self,
            Self::InvalidInput(_) | Self::NotFound(_) | Self::Api(ApiError::NotFound(_))
        )
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Log a failed data-loading operation, capture it to Sentry and return the
/// message to display.
pub fn capture_client_error(err: &ClientError, action: Action) -> String {
    if err.is_reportable() {
        let event_id = sentry::capture_error(err);
        tracing::error!(
            error = %err,
            action = ?action,
            sentry_event_id = %event_id,
            "Client operation failed"
        );
    } else {
        tracing::warn!(error = %err, action = ?action, "Client operation rejected");
    }
    err.user_message(action)
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("swipe", "Liked product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = ClientError::InvalidInput("age must be between 13 and 120".to_string());
        assert_eq!(err.to_string(), "Invalid input: age must be between 13 and 120");
    }

    #[test]
    fn test_user_message_hides_server_details() {
        let err = ClientError::Api(ApiError::Status {
            status: 500,
            message: "psycopg2.OperationalError: connection refused".to_string(),
        });
        assert_eq!(err.user_message(Action::LoadProducts), "failed to load products");
        assert!(err.is_reportable());
    }

    #[test]
    fn test_user_message_passes_input_errors_through() {
        let err = ClientError::InvalidInput("Name is required".to_string());
        assert_eq!(err.user_message(Action::SaveLocalState), "Name is required");
        assert!(!err.is_reportable());
    }

    #[test]
    fn test_capture_without_sentry_client_returns_message() {
        let err = ClientError::Api(ApiError::Url("bad".to_string()));
        assert_eq!(capture_client_error(&err, Action::LoadFeed), "failed to load feed");
    }
}
