use client::family_code::{resolve_family, CopyStatus, FamilySource};
use client::SessionStore;
use common::FamilyRef;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::browser::{self, BrowserStorage};
use crate::settings::get_settings;
use crate::ui::status::{StatusKind, StatusMessage};

#[derive(Clone, Copy, PartialEq)]
enum CopyTarget {
    Code,
    Link,
}

async fn copy(target: CopyTarget, family: &FamilyRef) -> CopyStatus {
    let text = match target {
        CopyTarget::Code => Ok(family.family_code.clone()),
        CopyTarget::Link => browser::share_link(family),
    };
    let result = match text {
        Ok(text) => browser::write_clipboard(&text).await,
        Err(e) => Err(e),
    };
    match (result, target) {
        (Ok(()), CopyTarget::Code) => CopyStatus::CodeCopied,
        (Ok(()), CopyTarget::Link) => CopyStatus::LinkCopied,
        (Err(e), _) => {
            log::error!("Clipboard write failed: {}", e);
            CopyStatus::Failed
        }
    }
}

/// Shows the code of the selected family with copy and share actions.
#[function_component(FamilyCodeView)]
pub fn family_code_view() -> Html {
    let family = use_memo((), |_| {
        let session = SessionStore::new(BrowserStorage::session()).selected_family();
        let resolved = resolve_family(browser::query_family(), session);
        match &resolved {
            Some((family, FamilySource::Query)) => log::debug!("Family {} taken from the URL", family.family_id),
            Some((family, FamilySource::Session)) => log::debug!("Family {} taken from the session", family.family_id),
            None => log::info!("No family to display"),
        }
        resolved.map(|(family, _)| family)
    });
    let status = use_state(|| None::<CopyStatus>);
    let clear_timer: Rc<RefCell<Option<Timeout>>> = use_mut_ref(|| None);

    let Some(family) = (*family).clone() else {
        return html! {
            <div class="card bg-base-100 shadow-sm max-w-lg mx-auto">
                <div class="card-body items-center text-center">
                    <h2 class="card-title">{"No family selected"}</h2>
                    <p class="text-sm text-gray-500">{"Pick a family to see its code."}</p>
                    <a class="btn btn-primary btn-sm" href={get_settings().family_select_url}>
                        {"Select a family"}
                    </a>
                </div>
            </div>
        };
    };

    let on_copy = {
        let status = status.clone();
        let clear_timer = clear_timer.clone();
        let family = family.clone();
        Callback::from(move |target: CopyTarget| {
            let status = status.clone();
            let clear_timer = clear_timer.clone();
            let family = family.clone();
            spawn_local(async move {
                let outcome = copy(target, &family).await;
                status.set(Some(outcome));

                let delay = get_settings().status_message_ms;
                let reset = status.clone();
                // Replacing the handle cancels the previous reset.
                *clear_timer.borrow_mut() = Some(Timeout::new(delay, move || reset.set(None)));
            });
        })
    };

    let on_copy_code = {
        let on_copy = on_copy.clone();
        Callback::from(move |_: MouseEvent| on_copy.emit(CopyTarget::Code))
    };
    let on_share = Callback::from(move |_: MouseEvent| on_copy.emit(CopyTarget::Link));

    html! {
        <div class="card bg-base-100 shadow-sm max-w-lg mx-auto">
            <div class="card-body gap-4">
                <h2 class="card-title">{&family.family_name}</h2>
                <div class="text-center">
                    <p class="text-sm text-gray-500">{"Family code"}</p>
                    <p class="font-mono text-3xl tracking-widest">{&family.family_code}</p>
                </div>
                <div class="card-actions justify-center">
                    <button class="btn btn-primary btn-sm" onclick={on_copy_code}>
                        <i class="fas fa-copy"></i>
                        {" Copy code"}
                    </button>
                    <button class="btn btn-outline btn-sm" onclick={on_share}>
                        <i class="fas fa-share-alt"></i>
                        {" Share link"}
                    </button>
                </div>
                if let Some(outcome) = *status {
                    <StatusMessage
                        message={outcome.message()}
                        kind={if outcome.is_error() { StatusKind::Error } else { StatusKind::Success }}
                    />
                }
            </div>
        </div>
    }
}
