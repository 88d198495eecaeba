//! Unread-message and new-family-member counts.
//!
//! New members are detected client-side: the current `(family, member)` pairs
//! are compared against a baseline stored per user. Only a raw count comes out
//! of the diff; removed members and the family a newcomer joined are not
//! tracked.

use futures::future;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

use crate::backend::Backend;
use crate::error::Result;
use crate::storage::KeyValueStore;

const PAIR_SEPARATOR: char = ':';
const KEY_SEPARATOR: &str = "|";

/// Storage key of the membership baseline for `user_id`.
pub fn snapshot_key(user_id: &str) -> String {
    format!("family_members_{user_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotificationCounts {
    pub unread: u32,
    pub new_members: u32,
}

impl NotificationCounts {
    pub fn total(&self) -> u32 {
        self.unread.saturating_add(self.new_members)
    }
}

/// What the user acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Messages,
    Family,
}

/// Canonical set of `family_id:user_id` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MembershipSnapshot {
    pairs: BTreeSet<String>,
}

impl MembershipSnapshot {
    pub fn from_pairs<I, F, U>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, U)>,
        F: AsRef<str>,
        U: AsRef<str>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(family, user)| format!("{}{PAIR_SEPARATOR}{}", family.as_ref(), user.as_ref()))
                .collect(),
        }
    }

    /// Parses a stored key. The empty key is the empty snapshot.
    pub fn parse(key: &str) -> Self {
        Self {
            pairs: key
                .split(KEY_SEPARATOR)
                .filter(|pair| !pair.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Sorted pairs joined into one string.
    pub fn key(&self) -> String {
        let pairs: Vec<&str> = self.pairs.iter().map(String::as_str).collect();
        pairs.join(KEY_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs present here but absent from `baseline`.
    pub fn new_since(&self, baseline: &MembershipSnapshot) -> u32 {
        self.pairs.difference(&baseline.pairs).count() as u32
    }
}

/// Runs one notification check against the backend.
///
/// `local` is device-scoped storage holding the membership baselines.
pub struct NotificationChecker<B, L> {
    backend: B,
    local: L,
}

impl<B: Backend, L: KeyValueStore> NotificationChecker<B, L> {
    pub fn new(backend: B, local: L) -> Self {
        Self { backend, local }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Both counts, fetched concurrently. A failing half counts as zero.
    #[instrument(skip(self))]
    pub async fn check(&self, user_id: &str) -> NotificationCounts {
        let (unread, new_members) =
            future::join(self.backend.unread_count(user_id), self.new_members_count(user_id)).await;

        let unread = unread.unwrap_or_else(|err| {
            warn!(%err, "Unread count unavailable");
            0
        });
        let new_members = new_members.unwrap_or_else(|err| {
            warn!(%err, "New member count unavailable");
            0
        });

        let counts = NotificationCounts { unread, new_members };
        debug!(?counts, "Notification check finished");
        counts
    }

    /// Membership pairs across every family of `user_id`.
    pub async fn current_snapshot(&self, user_id: &str) -> Result<MembershipSnapshot> {
        let families = self.backend.user_families(user_id).await?;
        let rosters = future::try_join_all(
            families
                .iter()
                .map(|family| self.backend.family_members(&family.family_id)),
        )
        .await?;

        let pairs = families.iter().zip(rosters.iter()).flat_map(|(family, members)| {
            members
                .iter()
                .map(move |member| (family.family_id.as_str(), member.user_id.as_str()))
        });
        Ok(MembershipSnapshot::from_pairs(pairs))
    }

    /// Members that appeared since the stored baseline.
    ///
    /// The first check for a user has nothing to compare against: it stores
    /// the current snapshot and reports zero.
    pub async fn new_members_count(&self, user_id: &str) -> Result<u32> {
        let current = self.current_snapshot(user_id).await?;
        let key = snapshot_key(user_id);

        match self.local.get(&key)? {
            Some(stored) => {
                let count = current.new_since(&MembershipSnapshot::parse(&stored));
                debug!(count, "Compared membership against baseline");
                Ok(count)
            }
            None => {
                info!(pairs = current.len(), "Seeding membership baseline");
                self.local.set(&key, &current.key())?;
                Ok(0)
            }
        }
    }

    /// Acknowledges `kind` and returns fresh counts.
    #[instrument(skip(self))]
    pub async fn clear(&self, user_id: &str, kind: NotificationKind) -> Result<NotificationCounts> {
        match kind {
            NotificationKind::Messages => self.backend.mark_all_read(user_id).await?,
            NotificationKind::Family => {
                let current = self.current_snapshot(user_id).await?;
                self.local.set(&snapshot_key(user_id), &current.key())?;
            }
        }
        info!("Notifications acknowledged");
        Ok(self.check(user_id).await)
    }
}
