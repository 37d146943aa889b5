use std::pin::Pin;

use futures::Future;

pub trait MaintenanceClient {
    /// Fires a maintenance endpoint. Failures are logged and swallowed, so
    /// the caller's control flow never depends on the outcome.
    fn trigger<'a>(
        &'a self,
        endpoint: &'a str,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}
