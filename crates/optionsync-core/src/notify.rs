//! Transient operator notifications.

/// Receives the outcome messages of store calls.
pub trait Notifier {
    fn error(&self, message: &str);

    fn success(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn error(&self, message: &str) {
        (**self).error(message);
    }

    fn success(&self, message: &str) {
        (**self).success(message);
    }
}
