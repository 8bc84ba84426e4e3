//! Notifier port for blocking, user-facing alerts.

/// Shows a message the user has to notice before carrying on.
pub trait Notifier: Send + Sync {
    /// Present `message` to the user.
    fn alert(&self, message: &str);
}
