/// Result of asking the host for permission to show notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Error from the host notification service
#[derive(Debug, thiserror::Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Host notification capability.
///
/// `show` is fire-and-forget: there is no delivery confirmation and the
/// caller never retries.
pub trait Notifier {
    /// Ask once whether notifications may be shown
    fn request_permission(&mut self) -> Permission;
    /// Display a notification
    fn show(&mut self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Desktop notifications through the platform notification daemon
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        DesktopNotifier { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&mut self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn show(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .summary(title)
            .body(body)
            .appname("daily-todo")
            .icon("alarm-clock")
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError(e.to_string()))
    }
}

/// A notifier that never gets permission (headless runs, notifications off)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn request_permission(&mut self) -> Permission {
        Permission::Denied
    }

    fn show(&mut self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_desktop_notifier_is_denied() {
        assert_eq!(
            DesktopNotifier::new(false).request_permission(),
            Permission::Denied
        );
        assert_eq!(
            DesktopNotifier::new(true).request_permission(),
            Permission::Granted
        );
    }

    #[test]
    fn null_notifier_is_denied_and_silent() {
        let mut n = NullNotifier;
        assert_eq!(n.request_permission(), Permission::Denied);
        assert!(n.show("t", "b").is_ok());
    }
}
