use common::{FamilyRef, FamilySummary, SessionUser};
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::KeyValueStore;

pub const CURRENT_USER_KEY: &str = "currentUser";
pub const USER_FAMILIES_KEY: &str = "userFamilies";
pub const SELECTED_FAMILY_KEY: &str = "selectedFamily";
pub const MEAL_CODE_DATA_KEY: &str = "mealCodeData";

/// Every key owned by the tab session; all of them go on logout.
pub const SESSION_KEYS: [&str; 4] = [
    CURRENT_USER_KEY,
    USER_FAMILIES_KEY,
    SELECTED_FAMILY_KEY,
    MEAL_CODE_DATA_KEY,
];

/// Typed access to the session-scoped storage of the current tab.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.storage
            .get_json::<SessionUser>(CURRENT_USER_KEY)
            .filter(|user| !user.user_id.trim().is_empty())
    }

    pub fn set_current_user(&self, user: &SessionUser) -> Result<()> {
        self.storage.set_json(CURRENT_USER_KEY, user)
    }

    pub fn families(&self) -> Vec<FamilySummary> {
        self.storage
            .get_json(USER_FAMILIES_KEY)
            .unwrap_or_default()
    }

    pub fn set_families(&self, families: &[FamilySummary]) -> Result<()> {
        self.storage.set_json(USER_FAMILIES_KEY, &families)
    }

    pub fn selected_family(&self) -> Option<FamilyRef> {
        self.storage.get_json(SELECTED_FAMILY_KEY)
    }

    pub fn set_selected_family(&self, family: &FamilyRef) -> Result<()> {
        self.storage.set_json(SELECTED_FAMILY_KEY, family)
    }

    /// Removes every session key.
    ///
    /// All keys are attempted even if one fails; the last failure is returned.
    pub fn clear(&self) -> Result<()> {
        let mut outcome = Ok(());
        for key in SESSION_KEYS {
            if let Err(err) = self.storage.remove(key) {
                warn!(key, %err, "Failed to remove session key");
                outcome = Err(err);
            }
        }
        debug!("Session state cleared");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn seeded() -> (MemoryStore, SessionStore<MemoryStore>) {
        let storage = MemoryStore::new();
        let session = SessionStore::new(storage.clone());
        session.set_current_user(&SessionUser::new("alice", "Alice")).unwrap();
        session
            .set_selected_family(&FamilyRef::new("AB12CD34", "Home", "AB12CD34"))
            .unwrap();
        storage.set(USER_FAMILIES_KEY, "[]").unwrap();
        storage.set(MEAL_CODE_DATA_KEY, r#"{"meal_code":"x"}"#).unwrap();
        (storage, session)
    }

    #[test]
    fn test_clear_removes_all_session_keys() {
        let (storage, session) = seeded();
        storage.set("unrelated", "keep").unwrap();

        session.clear().unwrap();

        for key in SESSION_KEYS {
            assert!(!storage.contains(key), "{key} should be gone");
        }
        assert!(storage.contains("unrelated"));
    }

    #[test]
    fn test_current_user_round_trip() {
        let (_, session) = seeded();
        let user = session.current_user().unwrap();
        assert_eq!(user.user_id, "alice");
        assert_eq!(session.selected_family().unwrap().family_name, "Home");
    }

    #[test]
    fn test_blank_user_id_is_no_session() {
        let storage = MemoryStore::new();
        storage
            .set(CURRENT_USER_KEY, r#"{"user_id":"","user_name":"ghost"}"#)
            .unwrap();
        assert!(SessionStore::new(storage).current_user().is_none());
    }

    #[test]
    fn test_families_default_to_empty() {
        let session = SessionStore::new(MemoryStore::new());
        assert!(session.families().is_empty());
    }
}
