use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

pub const REMINDER_TITLE: &str = "Study Reminder 📚";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Notification permission has not been granted, so the reminder cannot be shown")]
    PermissionDenied,
    #[error("Failed to schedule notification: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub sound: bool,
}

impl NotificationContent {
    pub fn study_reminder(subject: &str, time: &str) -> Self {
        Self {
            title: REMINDER_TITLE.to_string(),
            body: format!("Time to study: {subject} at {time}"),
            sound: true,
        }
    }
}

/// Platform primitive for local alerts.
pub trait NotificationBackend {
    fn request_permission(&self) -> impl Future<Output = bool> + Send;

    fn schedule_once(
        &self,
        delay: Duration,
        content: NotificationContent,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Asks for permission and schedules a single, non-repeating reminder.
pub async fn schedule_reminder<B: NotificationBackend>(
    backend: &B,
    delay_seconds: u64,
    subject: &str,
    time: &str,
) -> Result<(), NotifyError> {
    if !backend.request_permission().await {
        warn!("notification permission denied");
        return Err(NotifyError::PermissionDenied);
    }
    let content = NotificationContent::study_reminder(subject, time);
    backend
        .schedule_once(Duration::from_secs(delay_seconds), content)
        .await?;
    info!(delay_seconds, subject, "reminder scheduled");
    Ok(())
}

/// Prints alerts to the terminal from detached timer tasks.
#[derive(Debug, Clone)]
pub struct TerminalNotifier {
    permission_granted: bool,
}

impl TerminalNotifier {
    pub fn new(permission_granted: bool) -> Self {
        Self { permission_granted }
    }
}

impl NotificationBackend for TerminalNotifier {
    async fn request_permission(&self) -> bool {
        self.permission_granted
    }

    async fn schedule_once(
        &self,
        delay: Duration,
        content: NotificationContent,
    ) -> Result<(), NotifyError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|err| NotifyError::Backend(err.to_string()))?;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            info!(title = %content.title, "reminder fired");
            let bell = if content.sound { "\x07" } else { "" };
            eprintln!("{bell}\n🔔 {}\n   {}\n", content.title, content.body);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct FakeBackend {
        granted: bool,
        scheduled: Mutex<Vec<(Duration, NotificationContent)>>,
    }

    impl FakeBackend {
        fn new(granted: bool) -> Self {
            Self {
                granted,
                scheduled: Mutex::new(Vec::new()),
            }
        }
    }

    impl NotificationBackend for FakeBackend {
        async fn request_permission(&self) -> bool {
            self.granted
        }

        async fn schedule_once(
            &self,
            delay: Duration,
            content: NotificationContent,
        ) -> Result<(), NotifyError> {
            self.scheduled.lock().unwrap().push((delay, content));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_schedule_reminder_granted() {
        let backend = FakeBackend::new(true);
        schedule_reminder(&backend, 90, "Calculus", "19:30")
            .await
            .unwrap();
        let scheduled = backend.scheduled.lock().unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].0, Duration::from_secs(90));
        assert_eq!(scheduled[0].1.title, REMINDER_TITLE);
        assert_eq!(scheduled[0].1.body, "Time to study: Calculus at 19:30");
    }

    #[tokio::test]
    async fn test_schedule_reminder_denied() {
        let backend = FakeBackend::new(false);
        let err = schedule_reminder(&backend, 90, "Calculus", "19:30")
            .await
            .unwrap_err();
        assert_eq!(err, NotifyError::PermissionDenied);
        assert!(backend.scheduled.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_terminal_notifier_schedules() {
        let notifier = TerminalNotifier::new(true);
        assert!(notifier.request_permission().await);
        let content = NotificationContent::study_reminder("Biology", "08:00");
        assert!(
            notifier
                .schedule_once(Duration::from_secs(3600), content)
                .await
                .is_ok()
        );
    }
}
