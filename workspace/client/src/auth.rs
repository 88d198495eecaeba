use common::SessionUser;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;

/// Result of checking the cached session against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(SessionUser),
    NotAuthenticated,
}

impl AuthOutcome {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::NotAuthenticated => None,
        }
    }
}

/// Confirms that the tab's cached user still exists server-side.
pub struct AuthGuard<S, B> {
    session: SessionStore<S>,
    backend: B,
}

impl<S: KeyValueStore, B: Backend> AuthGuard<S, B> {
    pub fn new(session: SessionStore<S>, backend: B) -> Self {
        Self { session, backend }
    }

    /// Looks the cached user up on the backend.
    ///
    /// Any failure, including an unreachable backend, invalidates the session
    /// and wipes it from storage. On success the cached user is returned as is.
    pub async fn verify(&self) -> AuthOutcome {
        let Some(user) = self.session.current_user() else {
            debug!("No cached session");
            return AuthOutcome::NotAuthenticated;
        };

        match self.backend.user(&user.user_id).await {
            Ok(_) => {
                info!(user_id = %user.user_id, "Session verified");
                AuthOutcome::Authenticated(user)
            }
            Err(err) => {
                warn!(user_id = %user.user_id, %err, "Session rejected, clearing local state");
                if let Err(err) = self.session.clear() {
                    warn!(%err, "Session state only partially cleared");
                }
                AuthOutcome::NotAuthenticated
            }
        }
    }

    /// Like [`verify`](Self::verify) but runs `on_failure` when there is no
    /// valid session.
    pub async fn require<F: FnOnce()>(&self, on_failure: F) -> Option<SessionUser> {
        match self.verify().await {
            AuthOutcome::Authenticated(user) => Some(user),
            AuthOutcome::NotAuthenticated => {
                on_failure();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::session::SESSION_KEYS;
    use crate::storage::MemoryStore;
    use common::FamilyRef;
    use std::cell::Cell;

    fn logged_in(user_id: &str) -> MemoryStore {
        let storage = MemoryStore::new();
        let session = SessionStore::new(storage.clone());
        session.set_current_user(&SessionUser::new(user_id, "Someone")).unwrap();
        session.set_families(&[]).unwrap();
        session
            .set_selected_family(&FamilyRef::new("AB12CD34", "Home", "AB12CD34"))
            .unwrap();
        storage.set("mealCodeData", "{}").unwrap();
        storage
    }

    #[tokio::test]
    async fn test_known_user_is_returned_unchanged() {
        let storage = logged_in("alice");
        let guard = AuthGuard::new(SessionStore::new(storage.clone()), FakeBackend::default().with_user("alice"));

        let outcome = guard.verify().await;

        // the backend reports the name in uppercase; the cached one must win
        assert_eq!(outcome.user().map(|u| u.user_name.as_str()), Some("Someone"));
        assert!(storage.contains("currentUser"));
    }

    #[tokio::test]
    async fn test_unknown_user_clears_session_and_fails() {
        let storage = logged_in("ghost");
        let guard = AuthGuard::new(SessionStore::new(storage.clone()), FakeBackend::default().with_user("alice"));
        let redirected = Cell::new(false);

        let user = guard.require(|| redirected.set(true)).await;

        assert!(user.is_none());
        assert!(redirected.get());
        for key in SESSION_KEYS {
            assert!(!storage.contains(key), "{key} should be removed");
        }
    }

    #[tokio::test]
    async fn test_network_failure_is_treated_as_invalid_session() {
        let storage = logged_in("alice");
        let backend = FakeBackend::default().with_user("alice");
        backend.offline.set(true);
        let guard = AuthGuard::new(SessionStore::new(storage.clone()), backend);

        assert_eq!(guard.verify().await, AuthOutcome::NotAuthenticated);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_missing_session_skips_backend() {
        let backend = FakeBackend::default();
        backend.offline.set(true);
        let guard = AuthGuard::new(SessionStore::new(MemoryStore::new()), backend);
        let redirected = Cell::new(false);

        assert!(guard.require(|| redirected.set(true)).await.is_none());
        assert!(redirected.get());
    }
}
