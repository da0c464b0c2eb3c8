use thiserror::Error;

use crate::client::RemoteError;
use crate::notifier::NotifyError;
use crate::reminder::ResolveError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Use date format YYYY-MM-DD and time format HH:MM")]
    InvalidFormat,
    #[error("Please pick a date and time later than now")]
    PastTime,
    #[error("Notification permission has not been granted, so the reminder cannot be shown")]
    PermissionDenied,
    #[error("Could not reach the schedule server: {0}")]
    NetworkFailure(#[from] RemoteError),
    #[error("Failed to schedule the reminder: {0}")]
    Notification(String),
}

impl AppError {
    /// Title and body of the alert shown for this error.
    pub fn user_message(&self) -> (&'static str, String) {
        let title = match self {
            AppError::Validation(_) => "Error",
            AppError::InvalidFormat => "Wrong format",
            AppError::PastTime => "Time has passed",
            AppError::PermissionDenied => "Notifications not allowed",
            AppError::NetworkFailure(_) => "Network error",
            AppError::Notification(_) => "Reminder error",
        };
        (title, self.to_string())
    }
}

impl From<ResolveError> for AppError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::InvalidFormat => AppError::InvalidFormat,
            ResolveError::PastTime => AppError::PastTime,
        }
    }
}

impl From<NotifyError> for AppError {
    fn from(value: NotifyError) -> Self {
        match value {
            NotifyError::PermissionDenied => AppError::PermissionDenied,
            NotifyError::Backend(msg) => {
                tracing::error!("notification backend error: {msg}");
                AppError::Notification(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_errors_map_to_taxonomy() {
        assert!(matches!(
            AppError::from(ResolveError::InvalidFormat),
            AppError::InvalidFormat
        ));
        assert!(matches!(AppError::from(ResolveError::PastTime), AppError::PastTime));
    }

    #[test]
    fn test_user_message() {
        let (title, body) = AppError::from(NotifyError::PermissionDenied).user_message();
        assert_eq!(title, "Notifications not allowed");
        assert!(body.contains("permission"));

        let (title, body) = AppError::Validation("Subject is required".into()).user_message();
        assert_eq!(title, "Error");
        assert_eq!(body, "Subject is required");
    }

    #[test]
    fn test_network_failure_from_status() {
        let err = AppError::from(RemoteError::Status(http::StatusCode::BAD_GATEWAY));
        assert_eq!(err.user_message().0, "Network error");
        assert!(err.to_string().contains("502"));
    }
}
