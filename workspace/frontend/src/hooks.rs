use client::badge::HeaderBadges;
use client::poller::CountsSink;
use client::{NotificationChecker, NotificationCounts, NotificationKind, NotificationPoller};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api_client::HttpBackend;
use crate::browser::{self, BrowserStorage, GlooTimer};
use crate::settings::get_settings;

/// API fetch state enum
#[derive(Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&String> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

pub type BrowserPoller = NotificationPoller<HttpBackend, BrowserStorage, GlooTimer>;

/// Polls notification counts for `user_id` while the calling component is
/// mounted and the id does not change.
///
/// Returns the current badges and a callback that acknowledges one kind of
/// notification and then navigates to the given URL, so the page change
/// cannot cut the acknowledgement short. `None` keeps polling stopped.
#[hook]
pub fn use_notification_badges(
    user_id: Option<String>,
) -> (HeaderBadges, Callback<(NotificationKind, String)>) {
    let badges = use_state(HeaderBadges::default);
    let poller = use_mut_ref(|| None::<Rc<BrowserPoller>>);

    {
        let badges = badges.clone();
        let poller = poller.clone();
        use_effect_with(user_id, move |user_id| {
            if let Some(user_id) = user_id.clone() {
                let sink: CountsSink = Rc::new(move |counts: NotificationCounts| badges.set(HeaderBadges::from(counts)));
                let checker = NotificationChecker::new(HttpBackend, BrowserStorage::local());
                let instance = Rc::new(
                    NotificationPoller::new(checker, GlooTimer, sink)
                        .with_interval(get_settings().poll_interval()),
                );
                spawn_local(instance.start(&user_id));
                *poller.borrow_mut() = Some(instance);
            }

            move || {
                if let Some(instance) = poller.borrow_mut().take() {
                    instance.stop();
                }
            }
        });
    }

    let acknowledge = {
        let poller = poller.clone();
        Callback::from(move |(kind, href): (NotificationKind, String)| {
            let instance = poller.borrow().clone();
            spawn_local(async move {
                match instance {
                    Some(instance) => {
                        if let Some(Err(e)) = instance.clear(kind).await {
                            log::error!("Failed to clear {:?} notifications: {}", kind, e);
                        }
                    }
                    None => log::debug!("Ignoring {:?} acknowledgement, polling is stopped", kind),
                }
                browser::navigate(&href);
            });
        })
    };

    ((*badges).clone(), acknowledge)
}
