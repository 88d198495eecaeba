use client::Result;
use common::{OkResponse, UnreadCount};

use crate::api_client;

/// Get the number of unread messages of a user
pub async fn get_unread_count(user_id: &str) -> Result<u32> {
    log::trace!("Fetching unread message count for user {}", user_id);
    let result = api_client::get::<UnreadCount>(&format!("/messages/user/{}/unread-count", user_id))
        .await
        .map(|count| count.unread_count);
    if let Err(e) = &result {
        log::error!("Failed to fetch unread count for user {}: {}", user_id, e);
    }
    result
}

/// Mark every message of a user as read
pub async fn mark_all_read(user_id: &str) -> Result<OkResponse> {
    log::debug!("Marking all messages read for user {}", user_id);
    let result = api_client::post::<OkResponse>(&format!("/messages/user/{}/read-all", user_id)).await;
    match &result {
        Ok(_) => log::info!("All messages marked read for user {}", user_id),
        Err(e) => log::error!("Failed to mark messages read for user {}: {}", user_id, e),
    }
    result
}
