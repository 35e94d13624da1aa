use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use portfolio_client_core::config::SiteConfig;
use portfolio_client_core::notification::{NotificationId, NotificationSurface};
use portfolio_client_core::search::SearchDebouncer;
use portfolio_client_core::submission::{FormKind, FormPolicy, SubmissionAttempt};
use serde::Serialize;
use wasm_bindgen::prelude::Closure;
use web_sys::HtmlElement;

/// Everything the page handlers share, owned by one `UiSession`.
pub(crate) struct SessionState {
    pub(crate) config: SiteConfig,
    pub(crate) notifications: NotificationSurface,
    pub(crate) notification_slot: Option<NotificationSlot>,
    pub(crate) forms: HashMap<FormKind, FormSession>,
    pub(crate) search: SearchDebouncer,
    pub(crate) search_timer: Option<Timeout>,
    pub(crate) diagnostics: SiteDiagnostics,
}

impl SessionState {
    pub(crate) fn new(config: SiteConfig, config_source: &str) -> Self {
        let diagnostics = SiteDiagnostics {
            config_source: config_source.to_string(),
            ..SiteDiagnostics::default()
        };
        Self {
            notifications: NotificationSurface::new(config.notifications.clone()),
            search: SearchDebouncer::new(config.search.clone()),
            config,
            notification_slot: None,
            forms: HashMap::new(),
            search_timer: None,
            diagnostics,
        }
    }
}

/// The mounted notification node and the timers tied to it. Dropping the
/// slot cancels both timers and releases the close handler.
pub(crate) struct NotificationSlot {
    pub(crate) id: NotificationId,
    pub(crate) element: HtmlElement,
    pub(crate) auto_dismiss: Option<Timeout>,
    pub(crate) removal: Option<Timeout>,
    pub(crate) _close_handler: Closure<dyn FnMut(web_sys::Event)>,
}

pub(crate) struct FormSession {
    pub(crate) policy: FormPolicy,
    pub(crate) attempt: SubmissionAttempt,
}

impl FormSession {
    pub(crate) fn new(kind: FormKind, config: &SiteConfig) -> Self {
        Self {
            policy: FormPolicy::for_kind(kind, config),
            attempt: SubmissionAttempt::new(kind),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SiteDiagnostics {
    pub(crate) phase: String,
    pub(crate) detail: String,
    pub(crate) config_source: String,
    pub(crate) features: Vec<String>,
    pub(crate) submissions_total: u64,
    pub(crate) submission_failures: u64,
    pub(crate) last_outcome: Option<String>,
    pub(crate) notifications_shown: u64,
    pub(crate) search_requests: u64,
    pub(crate) last_error: Option<String>,
}

impl Default for SiteDiagnostics {
    fn default() -> Self {
        Self {
            phase: "idle".to_string(),
            detail: "site behaviors not started".to_string(),
            config_source: "default".to_string(),
            features: Vec::new(),
            submissions_total: 0,
            submission_failures: 0,
            last_outcome: None,
            notifications_shown: 0,
            search_requests: 0,
            last_error: None,
        }
    }
}
