use super::*;

/// Reads the page-provided overrides from `window.__PORTFOLIO_SITE_CONFIG__`.
/// Any problem keeps the defaults so the page still works.
pub(super) fn load_site_config() -> (SiteConfig, &'static str) {
    let Some(window) = web_sys::window() else {
        return (SiteConfig::default(), "default");
    };
    let raw = match js_sys::Reflect::get(&window, &JsValue::from_str(SITE_CONFIG_GLOBAL)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => return (SiteConfig::default(), "default"),
    };

    let json = match raw.as_string() {
        Some(text) => text,
        None => match js_sys::JSON::stringify(&raw) {
            Ok(text) => String::from(text),
            Err(_) => {
                tracing::warn!("site config global is not serializable; using defaults");
                return (SiteConfig::default(), "default");
            }
        },
    };

    match SiteConfig::from_json_str(&json) {
        Ok(config) => (config, "window"),
        Err(error) => {
            tracing::warn!(%error, "invalid site config; using defaults");
            (SiteConfig::default(), "default")
        }
    }
}

pub(super) fn set_phase(session: &UiSession, phase: &str, detail: &str) {
    tracing::info!(phase, detail, "site phase");
    session.with_state(|state| {
        state.diagnostics.phase = phase.to_string();
        state.diagnostics.detail = detail.to_string();
    });
}

pub(super) fn record_feature(session: &UiSession, feature: &str) {
    session.with_state(|state| {
        if !state.diagnostics.features.iter().any(|known| known == feature) {
            state.diagnostics.features.push(feature.to_string());
        }
    });
}

pub(super) fn record_error(session: &UiSession, error: &str) {
    tracing::error!(error, "site behavior error");
    session.with_state(|state| state.diagnostics.last_error = Some(error.to_string()));
}

pub(super) fn host_kind(config: &SiteConfig) -> HostKind {
    HostKind::from_hostname(&current_hostname(), config)
}
