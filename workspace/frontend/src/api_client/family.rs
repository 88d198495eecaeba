use client::Result;
use common::FamilyMember;

use crate::api_client;

/// Get the members of a family
pub async fn get_family_members(family_id: &str) -> Result<Vec<FamilyMember>> {
    log::trace!("Fetching members of family {}", family_id);
    let result = api_client::get::<Vec<FamilyMember>>(&format!("/family/{}/members", family_id)).await;
    match &result {
        Ok(members) => log::debug!("Fetched {} members of family {}", members.len(), family_id),
        Err(e) => log::error!("Failed to fetch members of family {}: {}", family_id, e),
    }
    result
}
