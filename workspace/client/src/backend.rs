use async_trait::async_trait;
use common::{FamilyMember, FamilySummary, UserInfo};
use std::rc::Rc;

use crate::error::Result;

/// The backend endpoints the client depends on.
///
/// Implementations resolve paths against the published API base and wait for
/// it when it is not known yet.
#[async_trait(?Send)]
pub trait Backend {
    /// `GET /user/{user_id}`
    async fn user(&self, user_id: &str) -> Result<UserInfo>;

    /// `GET /messages/user/{user_id}/unread-count`
    async fn unread_count(&self, user_id: &str) -> Result<u32>;

    /// `POST /messages/user/{user_id}/read-all`
    async fn mark_all_read(&self, user_id: &str) -> Result<()>;

    /// `GET /user/{user_id}/families`
    async fn user_families(&self, user_id: &str) -> Result<Vec<FamilySummary>>;

    /// `GET /family/{family_id}/members`
    async fn family_members(&self, family_id: &str) -> Result<Vec<FamilyMember>>;
}

#[async_trait(?Send)]
impl<B: Backend + ?Sized> Backend for Rc<B> {
    async fn user(&self, user_id: &str) -> Result<UserInfo> {
        (**self).user(user_id).await
    }

    async fn unread_count(&self, user_id: &str) -> Result<u32> {
        (**self).unread_count(user_id).await
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<()> {
        (**self).mark_all_read(user_id).await
    }

    async fn user_families(&self, user_id: &str) -> Result<Vec<FamilySummary>> {
        (**self).user_families(user_id).await
    }

    async fn family_members(&self, family_id: &str) -> Result<Vec<FamilyMember>> {
        (**self).family_members(family_id).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::ClientError;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// Scriptable backend with call counters.
    #[derive(Default)]
    pub struct FakeBackend {
        pub users: RefCell<HashMap<String, UserInfo>>,
        pub unread: RefCell<HashMap<String, u32>>,
        pub families: RefCell<HashMap<String, Vec<FamilySummary>>>,
        pub members: RefCell<HashMap<String, Vec<FamilyMember>>>,
        pub fail_unread: Cell<bool>,
        pub fail_families: Cell<bool>,
        pub offline: Cell<bool>,
        pub unread_calls: Cell<u32>,
        pub read_all_calls: Cell<u32>,
    }

    impl FakeBackend {
        pub fn with_user(self, user_id: &str) -> Self {
            self.users.borrow_mut().insert(
                user_id.to_string(),
                UserInfo {
                    user_id: user_id.to_string(),
                    user_name: user_id.to_uppercase(),
                    joined_families: Vec::new(),
                },
            );
            self
        }

        pub fn set_unread(&self, user_id: &str, count: u32) {
            self.unread.borrow_mut().insert(user_id.to_string(), count);
        }

        pub fn join(&self, user_id: &str, family_id: &str, member_ids: &[&str]) {
            self.families
                .borrow_mut()
                .entry(user_id.to_string())
                .or_default()
                .push(FamilySummary {
                    family_id: family_id.to_string(),
                    family_name: format!("Family {family_id}"),
                    role: None,
                    display_name: None,
                    is_primary_today: None,
                });
            self.set_members(family_id, member_ids);
        }

        pub fn set_members(&self, family_id: &str, member_ids: &[&str]) {
            let members = member_ids
                .iter()
                .map(|id| FamilyMember {
                    user_id: id.to_string(),
                    role: None,
                    display_name: None,
                    user_name: None,
                })
                .collect();
            self.members.borrow_mut().insert(family_id.to_string(), members);
        }

        fn reachable(&self) -> Result<()> {
            if self.offline.get() {
                Err(ClientError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait(?Send)]
    impl Backend for FakeBackend {
        async fn user(&self, user_id: &str) -> Result<UserInfo> {
            self.reachable()?;
            self.users
                .borrow()
                .get(user_id)
                .cloned()
                .ok_or(ClientError::Http(404))
        }

        async fn unread_count(&self, user_id: &str) -> Result<u32> {
            self.reachable()?;
            self.unread_calls.set(self.unread_calls.get() + 1);
            if self.fail_unread.get() {
                return Err(ClientError::Http(500));
            }
            Ok(self.unread.borrow().get(user_id).copied().unwrap_or(0))
        }

        async fn mark_all_read(&self, user_id: &str) -> Result<()> {
            self.reachable()?;
            self.read_all_calls.set(self.read_all_calls.get() + 1);
            self.unread.borrow_mut().insert(user_id.to_string(), 0);
            Ok(())
        }

        async fn user_families(&self, user_id: &str) -> Result<Vec<FamilySummary>> {
            self.reachable()?;
            if self.fail_families.get() {
                return Err(ClientError::Http(500));
            }
            Ok(self.families.borrow().get(user_id).cloned().unwrap_or_default())
        }

        async fn family_members(&self, family_id: &str) -> Result<Vec<FamilyMember>> {
            self.reachable()?;
            self.members
                .borrow()
                .get(family_id)
                .cloned()
                .ok_or(ClientError::Http(404))
        }
    }
}
