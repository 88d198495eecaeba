use common::SessionUser;
use wasm_bindgen::prelude::wasm_bindgen;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
pub mod api_client;
pub mod browser;
pub mod hooks;
pub mod mount;
pub mod settings;
pub mod ui;

use components::auth_gate::AuthGate;
use components::family_code::FamilyCodeView;

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/family-code")]
    FamilyCode,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    log::debug!("Routing to: {:?}", routes);
    match routes {
        Route::Home => {
            log::trace!("Rendering Home page");
            html! { <AuthGate><Home /></AuthGate> }
        }
        Route::FamilyCode => {
            log::trace!("Rendering Family Code page");
            html! { <FamilyCodeView /> }
        }
        Route::NotFound => {
            log::warn!("404 - Route not found");
            html! { <h1>{"404 Not Found"}</h1> }
        }
    }
}

#[function_component(Home)]
fn home() -> Html {
    let user = use_context::<SessionUser>();

    use_effect_with((), |_| {
        mount::mount_user_header();
        || {
            mount::unmount_user_header();
        }
    });

    html! {
        <>
            <header class="app-header navbar bg-base-100 shadow-sm">
                <a class="text-xl font-bold px-4" href="/">{"Meal Planner"}</a>
            </header>
            <main class="p-6">
                <h1 class="text-2xl font-semibold">
                    { match &user {
                        Some(user) => format!("Welcome back, {}", user.display_name()),
                        None => "Welcome".to_string(),
                    } }
                </h1>
                <Link<Route> to={Route::FamilyCode} classes="link link-primary">
                    {"Show family code"}
                </Link<Route>>
            </main>
        </>
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

/// Pins the API base for this browser and persists it with the other
/// settings; takes effect on the next page load.
#[wasm_bindgen]
pub fn set_api_base(base: Option<String>) {
    settings::update_settings(|settings| {
        settings.api_base_override = base.filter(|b| !b.trim().is_empty());
    });
    if let Err(e) = settings::get_settings().save_to_storage() {
        log::error!("Failed to save settings: {:?}", e);
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    // Initialize settings first
    settings::init_settings();

    // Initialize logger with settings
    let settings = settings::get_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("=== Meal Planner Frontend Starting ===");
    log::info!("Application settings: {:?}", settings);
    log::debug!("Debug mode: {}", settings.debug_mode);

    api_client::init_api_base();

    log::trace!("Initializing Yew renderer");
    yew::Renderer::<App>::new().render();
    log::info!("Application initialized successfully");
}
