//! Common transport-layer types shared with the meal planner backend.
//! These structs mirror the backend's request/response payloads so the
//! client engine and the frontend deserialize API responses the same way.

mod family;

pub use family::{FamilyMember, FamilyRef, FamilySummary};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ===================== Session =====================

/// The logged-in user as cached in session storage under `currentUser`.
///
/// The login page stores whatever the backend returned, so any field beyond
/// `user_id` and `user_name` is kept in `extra` and written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            extra: Map::new(),
        }
    }

    /// Name shown in the header, falling back to the id when no name is set.
    pub fn display_name(&self) -> &str {
        if self.user_name.trim().is_empty() {
            &self.user_id
        } else {
            &self.user_name
        }
    }

    /// Single uppercase letter used for the avatar bubble.
    pub fn initial(&self) -> String {
        self.user_name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }
}

/// Response of `GET /user/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub joined_families: Vec<FamilySummary>,
}

// ===================== Messages =====================

/// Response of `GET /messages/user/{user_id}/unread-count`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UnreadCount {
    pub unread_count: u32,
}

// ===================== Generic =====================

/// Acknowledgement body used by mutating endpoints such as `read-all`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OkResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_keeps_unknown_fields() {
        let raw = r#"{"user_id":"alice","user_name":"Alice","ok":true,"message":"Login successful"}"#;
        let user: SessionUser = serde_json::from_str(raw).unwrap();
        assert_eq!(user.user_id, "alice");
        assert_eq!(user.extra.get("message"), Some(&Value::from("Login successful")));

        let back: Value = serde_json::to_value(&user).unwrap();
        assert_eq!(back["ok"], Value::Bool(true));
        assert_eq!(back["user_name"], Value::from("Alice"));
    }

    #[test]
    fn test_initial_and_display_name() {
        assert_eq!(SessionUser::new("bob", "bob").initial(), "B");
        assert_eq!(SessionUser::new("bob", "  ").initial(), "U");
        assert_eq!(SessionUser::new("bob", "").display_name(), "bob");
        assert_eq!(SessionUser::new("bob", "Bobby").display_name(), "Bobby");
    }

    #[test]
    fn test_user_info_without_families() {
        let info: UserInfo = serde_json::from_str(r#"{"user_id":"u1","user_name":"U"}"#).unwrap();
        assert!(info.joined_families.is_empty());
    }
}
