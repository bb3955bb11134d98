use parking_lot::RwLock;
use tracing::info;

use crate::models::Notification;

/// Permission state of the desktop notification API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// Never asked.
    #[default]
    Default,
    /// The user allowed notifications.
    Granted,
    /// The user refused notifications.
    Denied,
}

/// Operating-system notifications. No retries and no queueing.
pub trait Notifier: Send + Sync {
    /// Current permission.
    fn permission(&self) -> Permission;
    /// Ask the user; returns the resulting permission.
    fn request_permission(&self) -> Permission;
    /// Display `notification`. Only called while permission is granted.
    fn show(&self, notification: &Notification);
}

/// Notifier that writes to the log instead of the desktop.
#[derive(Debug)]
pub struct LogNotifier {
    permission: RwLock<Permission>,
    grant_on_request: bool,
}

impl LogNotifier {
    /// Notifier whose permission request resolves to granted or denied.
    pub fn new(grant_on_request: bool) -> Self {
        Self {
            permission: RwLock::new(Permission::Default),
            grant_on_request,
        }
    }

    /// Notifier that is already allowed to show notifications.
    pub fn granted() -> Self {
        Self {
            permission: RwLock::new(Permission::Granted),
            grant_on_request: true,
        }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Notifier for LogNotifier {
    fn permission(&self) -> Permission {
        *self.permission.read()
    }

    fn request_permission(&self) -> Permission {
        let mut permission = self.permission.write();
        if *permission == Permission::Default {
            *permission = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
        }
        *permission
    }

    fn show(&self, notification: &Notification) {
        info!(
            kind = %notification.kind,
            "{}: {}",
            notification.title,
            notification.message
        );
    }
}
