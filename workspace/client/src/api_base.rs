//! Discovery and publication of the backend base URL.
//!
//! The page does not know where the API lives. [`ApiBaseResolver`] probes a
//! list of candidate origins concurrently and the first healthy one wins; the
//! result is published once through an [`ApiBase`] handle that any number of
//! callers can await.

use async_trait::async_trait;
use futures::future::{self, Either};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::{ClientError, Result};
use crate::timer::Timer;

pub const HEALTH_PATH: &str = "/health";
pub const API_PATH: &str = "/api";
pub const DEFAULT_FALLBACK_BASE: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2500);
pub const CANDIDATE_HOSTS: [&str; 2] = ["127.0.0.1", "localhost"];
pub const CANDIDATE_PORTS: [u16; 3] = [8900, 8765, 8000];

/// The parts of `window.location` the candidate list depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Scheme with trailing colon, e.g. `https:`
    pub protocol: String,
    /// e.g. `https://meal.example:8443`
    pub origin: String,
}

impl PageLocation {
    pub fn new(protocol: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            origin: origin.into(),
        }
    }

    fn is_http(&self) -> bool {
        matches!(self.protocol.as_str(), "http:" | "https:")
    }
}

/// Builds the ordered, de-duplicated list of base URLs to probe.
///
/// Same-origin `/api` comes first when the page itself is served over HTTP,
/// then every `host × port` pair on the page's scheme (`http:` for `file:`
/// pages and the like).
pub fn candidate_bases(location: &PageLocation, hosts: &[&str], ports: &[u16]) -> Vec<String> {
    let mut candidates = Vec::with_capacity(1 + hosts.len() * ports.len());
    let protocol = if location.is_http() {
        candidates.push(format!("{}{}", location.origin.trim_end_matches('/'), API_PATH));
        location.protocol.as_str()
    } else {
        "http:"
    };

    for host in hosts {
        for port in ports {
            let candidate = format!("{protocol}//{host}:{port}{API_PATH}");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}

/// Health check of a single candidate base.
#[async_trait(?Send)]
pub trait HealthProbe {
    /// Succeeds only when `{base}/health` answers with a success status.
    async fn probe(&self, base: &str) -> Result<()>;
}

/// Write-once, awaitable holder of the resolved API base.
///
/// Clones share the same slot. The first [`publish`](Self::publish) wins and
/// wakes every pending [`get`](Self::get); later publishes leave it unchanged.
#[derive(Debug, Clone)]
pub struct ApiBase {
    slot: Rc<watch::Sender<Option<String>>>,
}

impl Default for ApiBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiBase {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot: Rc::new(slot) }
    }

    /// Returns whether this call set the value.
    pub fn publish(&self, base: impl Into<String>) -> bool {
        let base = base.into();
        let published = self.slot.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(base);
            true
        });
        if published {
            info!(base = ?self.current(), "API base published");
        } else {
            debug!("API base already published, ignoring");
        }
        published
    }

    /// The value if it has been published.
    pub fn current(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Waits until a value is published.
    pub async fn get(&self) -> Result<String> {
        let mut rx = self.slot.subscribe();
        let published = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| ClientError::BaseUnavailable)?;
        let base = (*published).clone();
        base.ok_or(ClientError::BaseUnavailable)
    }

    /// Joins `path` onto the base once it is available.
    pub async fn url(&self, path: &str) -> Result<String> {
        let base = self.get().await?;
        Ok(format!("{}{}", base.trim_end_matches('/'), path))
    }
}

/// Races health probes against the candidate list.
pub struct ApiBaseResolver<P, T> {
    probe: P,
    timer: T,
    candidates: Vec<String>,
    fallback: String,
    timeout: Duration,
}

impl<P: HealthProbe, T: Timer> ApiBaseResolver<P, T> {
    pub fn new(probe: P, timer: T, candidates: Vec<String>) -> Self {
        Self {
            probe,
            timer,
            candidates,
            fallback: DEFAULT_FALLBACK_BASE.to_string(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the first candidate whose probe succeeds, in completion order,
    /// or the fallback when none does.
    #[instrument(skip(self), fields(candidates = self.candidates.len()))]
    pub async fn resolve(&self) -> String {
        if self.candidates.is_empty() {
            warn!(fallback = %self.fallback, "No API base candidates, using fallback");
            return self.fallback.clone();
        }

        let attempts = self
            .candidates
            .iter()
            .map(|candidate| Box::pin(self.probe_with_timeout(candidate)));

        match future::select_ok(attempts).await {
            Ok((winner, _losers)) => {
                info!(%winner, "API base detected");
                winner
            }
            Err(last_error) => {
                warn!(fallback = %self.fallback, %last_error, "No API base candidate answered, using fallback");
                self.fallback.clone()
            }
        }
    }

    /// Resolves and publishes into `handle`, returning the value the handle
    /// ends up holding.
    pub async fn resolve_into(&self, handle: &ApiBase) -> String {
        let base = self.resolve().await;
        handle.publish(base.clone());
        handle.current().unwrap_or(base)
    }

    async fn probe_with_timeout(&self, candidate: &str) -> Result<String> {
        let probe = self.probe.probe(candidate);
        let deadline = self.timer.sleep(self.timeout);

        match future::select(probe, deadline).await {
            Either::Left((Ok(()), _)) => Ok(candidate.to_string()),
            Either::Left((Err(err), _)) => {
                debug!(candidate, %err, "Health probe failed");
                Err(err)
            }
            Either::Right(((), _)) => {
                debug!(candidate, "Health probe timed out");
                Err(ClientError::Timeout(self.timeout.as_millis() as u64))
            }
        }
    }
}
