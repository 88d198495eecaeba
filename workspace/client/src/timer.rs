use async_trait::async_trait;
use std::rc::Rc;
use std::time::Duration;

/// Source of delays for probe timeouts and the poll interval.
///
/// Dropping the returned future must cancel the underlying timer.
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

#[async_trait(?Send)]
impl<T: Timer + ?Sized> Timer for Rc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Timer driven by tokio's clock, so tests can run with paused time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TokioTimer;

    #[async_trait(?Send)]
    impl Timer for TokioTimer {
        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await
        }
    }
}
