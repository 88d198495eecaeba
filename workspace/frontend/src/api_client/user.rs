use client::Result;
use common::{FamilySummary, UserInfo};

use crate::api_client;

/// Get a user by ID; fails with `Http(404)` for unknown users
pub async fn get_user(user_id: &str) -> Result<UserInfo> {
    log::trace!("Fetching user with ID: {}", user_id);
    let result = api_client::get::<UserInfo>(&format!("/user/{}", user_id)).await;
    match &result {
        Ok(user) => log::info!("Fetched user: {} (ID: {})", user.user_name, user.user_id),
        Err(e) => log::warn!("Failed to fetch user {}: {}", user_id, e),
    }
    result
}

/// Get the families a user belongs to
pub async fn get_user_families(user_id: &str) -> Result<Vec<FamilySummary>> {
    log::trace!("Fetching families of user {}", user_id);
    let result = api_client::get::<Vec<FamilySummary>>(&format!("/user/{}/families", user_id)).await;
    match &result {
        Ok(families) => log::debug!("Fetched {} families for user {}", families.len(), user_id),
        Err(e) => log::error!("Failed to fetch families of user {}: {}", user_id, e),
    }
    result
}
