use client::badge::HAS_NOTIFICATION_CLASS;
use client::{NotificationKind, SessionStore};
use stylist::{css, StyleSource};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent};
use yew::prelude::*;

use crate::browser::{self, BrowserStorage};
use crate::hooks::use_notification_badges;
use crate::settings::get_settings;

fn header_style() -> StyleSource {
    css!(
        r#"
        position: relative;
        display: flex;
        align-items: center;
        gap: 0.5rem;
        margin-left: auto;

        .profile-button {
            position: relative;
            display: flex;
            align-items: center;
            gap: 0.5rem;
            padding: 0.25rem 0.75rem;
            border: none;
            border-radius: 9999px;
            background: transparent;
            cursor: pointer;
        }

        .avatar {
            display: inline-flex;
            align-items: center;
            justify-content: center;
            width: 2rem;
            height: 2rem;
            border-radius: 50%;
            background: #4f46e5;
            color: #fff;
            font-weight: 600;
        }

        .dropdown {
            position: absolute;
            top: 100%;
            right: 0;
            min-width: 12rem;
            margin-top: 0.25rem;
            padding: 0.5rem 0;
            border-radius: 0.5rem;
            background: #fff;
            box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15);
            z-index: 1000;
        }

        .dropdown a {
            position: relative;
            display: flex;
            justify-content: space-between;
            padding: 0.5rem 1rem;
            color: inherit;
            text-decoration: none;
        }

        .dropdown a:hover {
            background: #f3f4f6;
        }

        .badge {
            min-width: 1.25rem;
            padding: 0 0.375rem;
            border-radius: 9999px;
            background: #ef4444;
            color: #fff;
            font-size: 0.75rem;
            line-height: 1.25rem;
            text-align: center;
        }

        .profile-button .badge {
            position: absolute;
            top: -0.25rem;
            right: -0.25rem;
        }
        "#
    )
}

fn badge(text: &Option<String>) -> Html {
    match text {
        Some(text) => html! { <span class="badge">{text}</span> },
        None => html! {},
    }
}

fn notification_class(text: &Option<String>) -> Option<&'static str> {
    text.as_ref().map(|_| HAS_NOTIFICATION_CLASS)
}

/// Avatar, name and account dropdown of the signed-in user, with unread
/// message and new family member badges.
#[function_component(UserHeader)]
pub fn user_header() -> Html {
    let user = use_memo((), |_| SessionStore::new(BrowserStorage::session()).current_user());
    let open = use_state(|| false);
    let (badges, acknowledge) = use_notification_badges((*user).as_ref().map(|u| u.user_id.clone()));

    {
        let missing = user.is_none();
        use_effect_with(missing, |missing| {
            if *missing {
                log::warn!("User header rendered without a session");
                browser::redirect_to_login();
            }
            || ()
        });
    }

    {
        let open = open.clone();
        use_effect_with((), move |_| {
            let document = web_sys::window().and_then(|w| w.document());
            let listener = Closure::<dyn Fn(Event)>::new(move |_: Event| open.set(false));
            if let Some(document) = &document {
                if let Err(e) = document.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref()) {
                    log::error!("Failed to watch outside clicks: {:?}", e);
                }
            }

            move || {
                if let Some(document) = &document {
                    let _ = document.remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
                }
            }
        });
    }

    let Some(user) = (*user).clone() else {
        return html! {};
    };

    let on_profile_click = {
        let open = open.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            open.set(!*open);
        })
    };

    let settings = get_settings();

    let acknowledge_then_follow = |kind: NotificationKind, href: String| {
        let acknowledge = acknowledge.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            acknowledge.emit((kind, href.clone()));
        })
    };
    let on_messages_click = acknowledge_then_follow(NotificationKind::Messages, settings.messages_url.clone());
    let on_family_click = acknowledge_then_follow(NotificationKind::Family, settings.family_manage_url.clone());

    let on_logout = Callback::from(|e: MouseEvent| {
        e.prevent_default();
        log::info!("Logging out");
        if let Err(e) = SessionStore::new(BrowserStorage::session()).clear() {
            log::error!("Failed to clear session: {}", e);
        }
        browser::redirect_to_login();
    });

    html! {
        <div class={classes!("user-header", header_style())}>
            <button
                class={classes!("profile-button", notification_class(&badges.profile))}
                onclick={on_profile_click}
            >
                <span class="avatar">{user.initial()}</span>
                <span class="user-name">{user.display_name()}</span>
                {badge(&badges.profile)}
            </button>
            if *open {
                <div class="dropdown">
                    <a
                        href={settings.messages_url.clone()}
                        class={classes!(notification_class(&badges.messages))}
                        onclick={on_messages_click}
                    >
                        <span>{"Messages"}</span>
                        {badge(&badges.messages)}
                    </a>
                    <a
                        href={settings.family_manage_url.clone()}
                        class={classes!(notification_class(&badges.family))}
                        onclick={on_family_click}
                    >
                        <span>{"Manage family"}</span>
                        {badge(&badges.family)}
                    </a>
                    <a href={settings.login_url.clone()} onclick={on_logout}>
                        <span>{"Log out"}</span>
                    </a>
                </div>
            }
        </div>
    }
}
