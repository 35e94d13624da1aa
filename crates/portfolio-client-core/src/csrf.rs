//! CSRF token lookup.
//!
//! Django renders the token into a hidden `csrfmiddlewaretoken` field and
//! also sets a `csrftoken` cookie. The field wins; the cookie covers pages
//! whose template omitted the field.

pub const CSRF_FIELD_NAME: &str = "csrfmiddlewaretoken";
pub const CSRF_COOKIE_NAME: &str = "csrftoken";
pub const CSRF_HEADER_NAME: &str = "X-CSRFToken";
pub const REQUESTED_WITH_HEADER_NAME: &str = "X-Requested-With";
pub const REQUESTED_WITH_HEADER_VALUE: &str = "XMLHttpRequest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfTokenSource {
    FormField,
    Cookie,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    pub value: String,
    pub source: CsrfTokenSource,
}

impl CsrfToken {
    pub fn is_missing(&self) -> bool {
        self.source == CsrfTokenSource::Missing
    }
}

/// Picks the field value when it is non-blank, otherwise the named cookie.
/// When both are absent the token is empty and the request is still sent.
pub fn resolve_csrf_token(field_value: Option<&str>, cookie_header: Option<&str>) -> CsrfToken {
    if let Some(value) = field_value.map(str::trim).filter(|value| !value.is_empty()) {
        return CsrfToken {
            value: value.to_string(),
            source: CsrfTokenSource::FormField,
        };
    }

    match cookie_header.and_then(|cookies| cookie_value(cookies, CSRF_COOKIE_NAME)) {
        Some(value) => CsrfToken {
            value,
            source: CsrfTokenSource::Cookie,
        },
        None => CsrfToken {
            value: String::new(),
            source: CsrfTokenSource::Missing,
        },
    }
}

/// Reads one cookie out of a `document.cookie` style string.
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| key.trim() == name)
        .map(|(_, raw)| {
            urlencoding::decode(raw.trim())
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| raw.trim().to_string())
        })
        .find(|value| !value.is_empty())
}

/// Headers attached to every background submission. The CSRF header is
/// always present, empty when no token could be found.
pub fn submission_headers(token: &CsrfToken) -> [(&'static str, String); 2] {
    [
        (
            REQUESTED_WITH_HEADER_NAME,
            REQUESTED_WITH_HEADER_VALUE.to_string(),
        ),
        (CSRF_HEADER_NAME, token.value.clone()),
    ]
}
