use super::*;

use gloo_net::http::{Request, Response};
use portfolio_client_core::csrf::{
    REQUESTED_WITH_HEADER_NAME, REQUESTED_WITH_HEADER_VALUE, submission_headers,
};

#[derive(Debug, thiserror::Error)]
pub(super) enum TransportError {
    #[error("request aborted")]
    Aborted,
    #[error("failed to build request: {0}")]
    Build(String),
    #[error("network request failed: {0}")]
    Network(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

impl TransportError {
    fn from_gloo(error: gloo_net::Error) -> Self {
        match &error {
            gloo_net::Error::JsError(js_error) if js_error.name == "AbortError" => Self::Aborted,
            _ => Self::Network(error.to_string()),
        }
    }

    /// Aborts only happen when the timeout already won the race, so they
    /// are reported as a timeout rather than a network failure.
    pub(super) fn into_event(self) -> TransportEvent {
        match self {
            Self::Aborted => TransportEvent::TimedOut,
            Self::Build(message) | Self::Network(message) | Self::Body(message) => {
                TransportEvent::NetworkError { message }
            }
        }
    }
}

/// Posts the form in the background with the headers the server uses to
/// tell XHR submissions apart from native ones.
pub(super) async fn send_form_submission(
    action: &str,
    body: web_sys::FormData,
    csrf: &CsrfToken,
    signal: Option<&web_sys::AbortSignal>,
) -> Result<RawResponse, TransportError> {
    let mut builder = Request::post(action)
        .credentials(web_sys::RequestCredentials::SameOrigin)
        .abort_signal(signal);
    for (name, value) in submission_headers(csrf) {
        builder = builder.header(name, &value);
    }
    let request = builder
        .body(body)
        .map_err(|error| TransportError::Build(error.to_string()))?;
    let response = request.send().await.map_err(TransportError::from_gloo)?;
    read_raw_response(response).await
}

async fn read_raw_response(response: Response) -> Result<RawResponse, TransportError> {
    let status = response.status();
    let redirected = response.redirected();
    let url = response.url();
    let content_type = response.headers().get("content-type");
    let body = response
        .text()
        .await
        .map_err(|error| TransportError::Body(error.to_string()))?;
    Ok(RawResponse {
        status,
        redirected,
        url,
        content_type,
        body,
    })
}

pub(super) async fn fetch_search_fragment(url: &str) -> Result<String, TransportError> {
    let response = Request::get(url)
        .header(REQUESTED_WITH_HEADER_NAME, REQUESTED_WITH_HEADER_VALUE)
        .credentials(web_sys::RequestCredentials::SameOrigin)
        .send()
        .await
        .map_err(TransportError::from_gloo)?;
    if !response.ok() {
        return Err(TransportError::Network(format!(
            "search returned HTTP {}",
            response.status()
        )));
    }
    response
        .text()
        .await
        .map_err(|error| TransportError::Body(error.to_string()))
}
