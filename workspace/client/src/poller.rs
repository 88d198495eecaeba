use futures::future::{abortable, AbortHandle, LocalBoxFuture};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

use crate::backend::Backend;
use crate::error::Result;
use crate::notifications::{NotificationChecker, NotificationCounts, NotificationKind};
use crate::storage::KeyValueStore;
use crate::timer::Timer;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Receives the counts of every finished check.
pub type CountsSink = Rc<dyn Fn(NotificationCounts)>;

/// Periodic notification checks for one user at a time.
///
/// [`start`](Self::start) hands back the polling loop; the caller spawns it on
/// its executor. Starting again or calling [`stop`](Self::stop) cancels the
/// pending interval timer of the previous loop. A check already in flight is
/// allowed to finish and report, but no further check is scheduled.
pub struct NotificationPoller<B, L, T> {
    checker: Rc<NotificationChecker<B, L>>,
    timer: Rc<T>,
    interval: Duration,
    sink: CountsSink,
    generation: Rc<Cell<u64>>,
    pending_sleep: Rc<RefCell<Option<AbortHandle>>>,
    user_id: RefCell<Option<String>>,
}

impl<B, L, T> NotificationPoller<B, L, T>
where
    B: Backend + 'static,
    L: KeyValueStore + 'static,
    T: Timer + 'static,
{
    pub fn new(checker: NotificationChecker<B, L>, timer: T, sink: CountsSink) -> Self {
        Self {
            checker: Rc::new(checker),
            timer: Rc::new(timer),
            interval: DEFAULT_POLL_INTERVAL,
            sink,
            generation: Rc::new(Cell::new(0)),
            pending_sleep: Rc::new(RefCell::new(None)),
            user_id: RefCell::new(None),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn is_running(&self) -> bool {
        self.user_id.borrow().is_some()
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_id.borrow().clone()
    }

    /// Moves to running for `user_id` and returns the loop to spawn.
    ///
    /// The loop checks immediately, then once per interval, until the poller
    /// is stopped or restarted.
    pub fn start(&self, user_id: &str) -> LocalBoxFuture<'static, ()> {
        self.cancel_schedule();
        let generation = self.generation.get();
        *self.user_id.borrow_mut() = Some(user_id.to_string());
        info!(user_id, interval_ms = self.interval.as_millis() as u64, "Notification polling started");

        let checker = Rc::clone(&self.checker);
        let timer = Rc::clone(&self.timer);
        let sink = Rc::clone(&self.sink);
        let current = Rc::clone(&self.generation);
        let pending_sleep = Rc::clone(&self.pending_sleep);
        let interval = self.interval;
        let user_id = user_id.to_string();

        Box::pin(async move {
            loop {
                let counts = checker.check(&user_id).await;
                sink(counts);

                if current.get() != generation {
                    break;
                }
                let (sleep, handle) = abortable(timer.sleep(interval));
                *pending_sleep.borrow_mut() = Some(handle);
                if sleep.await.is_err() || current.get() != generation {
                    break;
                }
            }
            debug!(%user_id, "Notification loop finished");
        })
    }

    /// Moves to stopped. Idempotent.
    pub fn stop(&self) {
        self.cancel_schedule();
        if self.user_id.borrow_mut().take().is_some() {
            info!("Notification polling stopped");
        }
    }

    /// Runs a check for the polled user outside the schedule.
    pub async fn check_now(&self) -> Option<NotificationCounts> {
        let user_id = self.user_id()?;
        let counts = self.checker.check(&user_id).await;
        (self.sink)(counts);
        Some(counts)
    }

    /// Acknowledges `kind` for the polled user and reports fresh counts.
    pub async fn clear(&self, kind: NotificationKind) -> Option<Result<NotificationCounts>> {
        let user_id = self.user_id()?;
        let result = self.checker.clear(&user_id, kind).await;
        if let Ok(counts) = &result {
            (self.sink)(*counts);
        }
        Some(result)
    }

    fn cancel_schedule(&self) {
        self.generation.set(self.generation.get() + 1);
        if let Some(handle) = self.pending_sleep.borrow_mut().take() {
            handle.abort();
        }
    }
}

impl<B, L, T> Drop for NotificationPoller<B, L, T> {
    fn drop(&mut self) {
        self.generation.set(self.generation.get() + 1);
        if let Some(handle) = self.pending_sleep.borrow_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::storage::MemoryStore;
    use crate::timer::testing::TokioTimer;
    use tokio::task::{spawn_local, LocalSet};
    use tokio::time::sleep;

    type TestPoller = NotificationPoller<Rc<FakeBackend>, MemoryStore, TokioTimer>;

    fn poller() -> (TestPoller, Rc<FakeBackend>, Rc<RefCell<Vec<NotificationCounts>>>) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let backend = Rc::new(FakeBackend::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink: CountsSink = {
            let seen = Rc::clone(&seen);
            Rc::new(move |counts| seen.borrow_mut().push(counts))
        };
        let checker = NotificationChecker::new(Rc::clone(&backend), MemoryStore::new());
        (NotificationPoller::new(checker, TokioTimer, sink), backend, seen)
    }

    #[tokio::test(start_paused = true)]
    async fn test_checks_immediately_then_every_interval() {
        let (poller, backend, seen) = poller();
        backend.set_unread("alice", 3);

        LocalSet::new()
            .run_until(async {
                spawn_local(poller.start("alice"));
                sleep(Duration::from_secs(65)).await;
            })
            .await;

        // t = 0, 30, 60
        assert_eq!(backend.unread_calls.get(), 3);
        assert!(seen.borrow().iter().all(|c| c.unread == 3));
        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_keeps_a_single_schedule() {
        let (poller, backend, _seen) = poller();

        LocalSet::new()
            .run_until(async {
                spawn_local(poller.start("alice"));
                sleep(Duration::from_secs(10)).await;
                spawn_local(poller.start("alice"));
                sleep(Duration::from_secs(55)).await;
            })
            .await;

        // first loop: t = 0 only; second loop: t = 10, 40
        assert_eq!(backend.unread_calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_future_checks() {
        let (poller, backend, _seen) = poller();

        LocalSet::new()
            .run_until(async {
                spawn_local(poller.start("alice"));
                sleep(Duration::from_secs(31)).await;
                poller.stop();
                sleep(Duration::from_secs(120)).await;
            })
            .await;

        assert_eq!(backend.unread_calls.get(), 2);
        assert!(!poller.is_running());
        assert_eq!(poller.check_now().await, None);
    }

    #[tokio::test]
    async fn test_clear_messages_reports_zero() {
        let (poller, backend, seen) = poller();
        backend.set_unread("alice", 5);
        // the returned loop is dropped unspawned; only the state change matters here
        drop(poller.start("alice"));

        let counts = poller.clear(NotificationKind::Messages).await.unwrap().unwrap();

        assert_eq!(counts.unread, 0);
        assert_eq!(seen.borrow().last().map(|c| c.unread), Some(0));
    }

    #[tokio::test]
    async fn test_clear_finishes_backend_work_before_returning() {
        let (poller, backend, seen) = poller();
        backend.join("alice", "F1", &["alice"]);
        backend.set_unread("alice", 2);
        drop(poller.start("alice"));
        poller.check_now().await;

        backend.set_members("F1", &["alice", "bob"]);
        assert_eq!(poller.check_now().await.map(|c| c.new_members), Some(1));

        let counts = poller.clear(NotificationKind::Family).await.unwrap().unwrap();
        assert_eq!(counts.new_members, 0);
        assert_eq!(poller.check_now().await.map(|c| c.new_members), Some(0));

        poller.clear(NotificationKind::Messages).await.unwrap().unwrap();
        assert_eq!(backend.read_all_calls.get(), 1);
        assert_eq!(seen.borrow().last().map(|c| c.total()), Some(0));
    }

    #[tokio::test]
    async fn test_clear_without_user_does_nothing() {
        let (poller, backend, _seen) = poller();
        assert!(poller.clear(NotificationKind::Messages).await.is_none());
        assert_eq!(backend.read_all_calls.get(), 0);
    }
}
