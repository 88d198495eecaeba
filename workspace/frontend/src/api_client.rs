pub mod family;
pub mod health;
pub mod message;
pub mod user;

use async_trait::async_trait;
use client::api_base::candidate_bases;
use client::{ApiBase, ApiBaseResolver, Backend, ClientError, Result};
use common::{FamilyMember, FamilySummary, OkResponse, UserInfo};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::browser::{self, GlooTimer};
use crate::settings;
use health::HttpHealthProbe;

thread_local! {
    static API_BASE: ApiBase = ApiBase::new();
}

/// The page-wide API base handle. Every clone shares the same value.
pub fn api_base() -> ApiBase {
    API_BASE.with(ApiBase::clone)
}

/// Starts API base discovery unless settings pin a base.
///
/// Returns immediately; requests made before discovery finishes wait for it.
pub fn init_api_base() {
    let settings = settings::get_settings();
    let handle = api_base();

    if let Some(base) = settings.api_base_override.clone() {
        log::info!("Using configured API base: {}", base);
        handle.publish(base);
        return;
    }

    let hosts: Vec<&str> = settings.candidate_hosts.iter().map(String::as_str).collect();
    let candidates = candidate_bases(&browser::page_location(), &hosts, &settings.candidate_ports);
    log::debug!("Probing API base candidates: {:?}", candidates);

    let resolver = ApiBaseResolver::new(HttpHealthProbe, GlooTimer, candidates)
        .with_fallback(settings.fallback_api_base.clone())
        .with_timeout(settings.probe_timeout());

    wasm_bindgen_futures::spawn_local(async move {
        let base = resolver.resolve_into(&handle).await;
        log::info!("API base ready: {}", base);
    });
}

async fn send(method: &str, endpoint: &str, request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(|e| {
        let err = ClientError::Network(e.to_string());
        log::error!("{} {} - {}", method, endpoint, err);
        err
    })?;

    if !response.ok() {
        let err = ClientError::Http(response.status());
        log::warn!("{} {} - Non-OK response: {}", method, endpoint, response.status());
        return Err(err);
    }
    Ok(response)
}

async fn parse<T: DeserializeOwned>(method: &str, endpoint: &str, response: Response) -> Result<T> {
    log::trace!("{} {} - Response received, parsing JSON", method, endpoint);
    response.json::<T>().await.map_err(|e| {
        let err = ClientError::Decode(e.to_string());
        log::error!("{} {} - {}", method, endpoint, err);
        err
    })
}

/// Common GET request handler
pub async fn get<T>(endpoint: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let url = api_base().url(endpoint).await?;
    log::debug!("GET request to: {}", url);

    let response = send("GET", endpoint, Request::get(&url)).await?;
    let data = parse("GET", endpoint, response).await?;
    log::info!("GET {} - Success", endpoint);
    Ok(data)
}

/// Common POST request handler for body-less commands
pub async fn post<T>(endpoint: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let url = api_base().url(endpoint).await?;
    log::debug!("POST request to: {}", url);

    let response = send("POST", endpoint, Request::post(&url)).await?;
    let data = parse("POST", endpoint, response).await?;
    log::info!("POST {} - Success", endpoint);
    Ok(data)
}

/// [`Backend`] over the REST API at the page-wide API base.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpBackend;

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn user(&self, user_id: &str) -> Result<UserInfo> {
        user::get_user(user_id).await
    }

    async fn unread_count(&self, user_id: &str) -> Result<u32> {
        message::get_unread_count(user_id).await
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<()> {
        let _: OkResponse = message::mark_all_read(user_id).await?;
        Ok(())
    }

    async fn user_families(&self, user_id: &str) -> Result<Vec<FamilySummary>> {
        user::get_user_families(user_id).await
    }

    async fn family_members(&self, family_id: &str) -> Result<Vec<FamilyMember>> {
        family::get_family_members(family_id).await
    }
}
