//! Session and notification engine of the meal planner web client.
//!
//! Nothing in here touches the browser directly: storage, HTTP and timers are
//! reached through [`KeyValueStore`], [`Backend`], [`HealthProbe`] and
//! [`Timer`], which the frontend implements on top of web APIs and the tests
//! implement in memory.

pub mod api_base;
pub mod auth;
pub mod backend;
pub mod badge;
pub mod error;
pub mod family_code;
pub mod notifications;
pub mod poller;
pub mod session;
pub mod storage;
pub mod timer;

pub use api_base::{ApiBase, ApiBaseResolver, HealthProbe, PageLocation};
pub use auth::{AuthGuard, AuthOutcome};
pub use backend::Backend;
pub use badge::HeaderBadges;
pub use error::{ClientError, Result};
pub use notifications::{NotificationChecker, NotificationCounts, NotificationKind};
pub use poller::NotificationPoller;
pub use session::SessionStore;
pub use storage::{KeyValueStore, MemoryStore};
pub use timer::Timer;
