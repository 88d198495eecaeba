use client::{AuthGuard, SessionStore};
use common::SessionUser;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api_client::HttpBackend;
use crate::browser::{self, BrowserStorage};
use crate::ui::loading::Loading;
use crate::hooks::FetchState;

#[derive(Properties, PartialEq)]
pub struct AuthGateProps {
    pub children: Children,
    /// Runs when the tab has no valid session; defaults to the login redirect
    #[prop_or_default]
    pub on_failure: Option<Callback<()>>,
}

/// Renders its children only for a verified session and provides the
/// [`SessionUser`] to them as context.
#[function_component(AuthGate)]
pub fn auth_gate(props: &AuthGateProps) -> Html {
    let state = use_state(|| FetchState::<SessionUser>::Loading);

    {
        let state = state.clone();
        let on_failure = props.on_failure.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let guard = AuthGuard::new(SessionStore::new(BrowserStorage::session()), HttpBackend);
                let user = guard
                    .require(|| match &on_failure {
                        Some(callback) => callback.emit(()),
                        None => browser::redirect_to_login(),
                    })
                    .await;
                match user {
                    Some(user) => {
                        log::info!("Session verified for user {}", user.user_id);
                        state.set(FetchState::Success(user));
                    }
                    None => {
                        log::warn!("No valid session");
                        state.set(FetchState::Error("Not authenticated".to_string()));
                    }
                }
            });
            || ()
        });
    }

    if let Some(user) = state.data() {
        html! {
            <ContextProvider<SessionUser> context={user.clone()}>
                { props.children.clone() }
            </ContextProvider<SessionUser>>
        }
    } else if state.error().is_some() {
        html! {}
    } else {
        html! { <Loading text={"Checking your session..."} /> }
    }
}
