#![allow(clippy::needless_pass_by_value)]

#[cfg(target_arch = "wasm32")]
mod wasm_constants;
#[cfg(target_arch = "wasm32")]
mod wasm_state;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;
    use web_time::Duration;

    use futures_util::{FutureExt, pin_mut, select};
    use gloo_timers::callback::{Interval, Timeout};
    use gloo_timers::future::sleep;
    use portfolio_client_core::config::SiteConfig;
    use portfolio_client_core::csrf::{CSRF_FIELD_NAME, CsrfToken, resolve_csrf_token};
    use portfolio_client_core::filter::{ProjectFilter, visible_cards};
    use portfolio_client_core::notification::{MountPlan, NotificationId, NotificationKind};
    use portfolio_client_core::scroll::{
        CounterAnimation, CounterFrame, OnceTrigger, anchor_scroll_top, intersects_viewport,
        is_in_page_anchor, navbar_is_scrolled, parallax_transform, parse_counter_target,
        parse_parallax_speed, progress_width_css, reading_progress_percent,
        scroll_to_top_visible,
    };
    use portfolio_client_core::search::SearchAction;
    use portfolio_client_core::submission::{
        FieldValue, FormKind, FormSnapshot, HostKind, RawResponse, TransportEvent, UiEffect,
        pending_label, plan_effects,
    };
    use portfolio_client_core::theme::{
        THEME_ATTRIBUTE, THEME_CHANGE_EVENT, THEME_STORAGE_KEY, Theme, ThemeStore,
        load_initial_theme,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlElement, HtmlFormElement, HtmlInputElement};

    use crate::wasm_constants::*;
    use crate::wasm_state::{FormSession, NotificationSlot, SessionState, SiteDiagnostics};

    mod dom;
    mod effects;
    mod lifecycle;
    mod network;
    mod notifications;
    mod search;
    mod submission;

    use dom::*;
    use effects::*;
    use lifecycle::*;
    use network::*;
    use search::*;
    use submission::*;

    thread_local! {
        static SESSION: RefCell<Option<UiSession>> = const { RefCell::new(None) };
        static EVENT_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
    }

    /// Handle to the page's shared state. Handlers clone it instead of
    /// reaching for globals; the thread-local only anchors the root handle
    /// for the exported entry points.
    #[derive(Clone)]
    pub(super) struct UiSession {
        state: Rc<RefCell<SessionState>>,
    }

    impl UiSession {
        fn new(state: SessionState) -> Self {
            Self {
                state: Rc::new(RefCell::new(state)),
            }
        }

        /// Callers must not touch the DOM in ways that re-enter a handler
        /// synchronously while the borrow is held.
        pub(super) fn with_state<R>(&self, update: impl FnOnce(&mut SessionState) -> R) -> R {
            update(&mut self.state.borrow_mut())
        }

        pub(super) fn config(&self) -> SiteConfig {
            self.state.borrow().config.clone()
        }
    }

    fn current_session() -> Option<UiSession> {
        SESSION.with(|slot| slot.borrow().clone())
    }

    /// Attaches `handler` for the lifetime of the page.
    pub(super) fn listen(
        target: &web_sys::EventTarget,
        event_name: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
        if target
            .add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!(event_name, "failed to attach event listener");
            return;
        }
        EVENT_HANDLERS.with(|handlers| handlers.borrow_mut().push(callback));
    }

    pub(super) fn listen_passive(
        target: &web_sys::EventTarget,
        event_name: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(handler));
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(true);
        if target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_name,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .is_err()
        {
            tracing::warn!(event_name, "failed to attach passive listener");
            return;
        }
        EVENT_HANDLERS.with(|handlers| handlers.borrow_mut().push(callback));
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        let (config, config_source) = load_site_config();
        let session = UiSession::new(SessionState::new(config, config_source));
        SESSION.with(|slot| *slot.borrow_mut() = Some(session.clone()));
        set_phase(&session, "booting", "applying persisted theme");

        // Applied before the document finishes parsing to avoid a flash of
        // the wrong theme.
        apply_initial_theme();

        let document_loading = document()
            .map(|document| document.ready_state() == "loading")
            .unwrap_or(false);
        match (document_loading, web_sys::window()) {
            (true, Some(window)) => {
                let pending = Rc::new(RefCell::new(Some(session)));
                listen(window.as_ref(), "DOMContentLoaded", move |_event| {
                    if let Some(session) = pending.borrow_mut().take() {
                        install_behaviors(&session);
                    }
                });
            }
            _ => install_behaviors(&session),
        }
    }

    fn install_behaviors(session: &UiSession) {
        set_phase(session, "installing", "attaching page behaviors");
        let installers: [(&str, fn(&UiSession) -> bool); 13] = [
            ("theme_toggle", install_theme_toggle),
            ("scroll_effects", install_scroll_effects),
            ("scroll_to_top", install_scroll_to_top),
            ("anchor_scroll", install_anchor_scroll),
            ("mobile_menu", install_mobile_menu_close),
            ("viewport_reveals", install_viewport_reveals),
            ("project_filter", install_project_filter),
            ("copy_buttons", install_copy_buttons),
            ("contact_form", install_contact_form),
            ("newsletter_form", install_newsletter_form),
            ("validation", install_validation_gates),
            ("search", install_search),
            ("preloader", install_preloader),
        ];
        for (feature, install) in installers {
            if install(session) {
                record_feature(session, feature);
            }
        }
        set_phase(session, "ready", "page behaviors installed");
    }

    #[wasm_bindgen]
    pub fn diagnostics_json() -> String {
        let Some(session) = current_session() else {
            return serde_json::to_string(&SiteDiagnostics::default()).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}".to_string()
            });
        };
        session.with_state(|state| {
            serde_json::to_string(&state.diagnostics).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}".to_string()
            })
        })
    }

    #[wasm_bindgen]
    pub fn show_notification(kind: String, message: String) {
        let Some(session) = current_session() else {
            tracing::warn!("notification requested before start");
            return;
        };
        session.notify(NotificationKind::parse(&kind), &message);
    }

    #[wasm_bindgen]
    pub fn toggle_theme() -> String {
        apply_toggled_theme().as_str().to_string()
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::diagnostics_json;

#[cfg(not(target_arch = "wasm32"))]
pub fn diagnostics_json() -> String {
    "{\"phase\":\"native\",\"detail\":\"site diagnostics only available on wasm\"}".to_string()
}
