//! Background form submission.
//!
//! One submit produces one [`SubmissionAttempt`]. The transport reports a
//! single [`TransportEvent`], [`resolve_outcome`] turns it into a
//! [`SubmissionOutcome`], and [`plan_effects`] lists the DOM work for that
//! outcome. The browser layer only executes the plan.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SiteConfig;
use crate::notification::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Contact,
    Newsletter,
}

impl FormKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Newsletter => "newsletter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessages {
    pub success: &'static str,
    pub failure: &'static str,
    pub network: &'static str,
    pub timeout: &'static str,
    pub timeout_fallback: &'static str,
}

/// Per-form behavior. The contact form navigates to a success page and
/// falls back to a native submission; the newsletter form does neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPolicy {
    pub kind: FormKind,
    pub timeout_ms: u32,
    pub pending_tick_ms: u32,
    pub pending_label: &'static str,
    pub success_location: Option<String>,
    pub success_redirect_delay_ms: u32,
    pub timeout_redirect_delay_ms: u32,
    pub fallback_delay_ms: u32,
    pub native_fallback: bool,
    pub messages: FormMessages,
}

impl FormPolicy {
    pub fn for_kind(kind: FormKind, config: &SiteConfig) -> Self {
        match kind {
            FormKind::Contact => Self {
                kind,
                timeout_ms: config.contact_timeout_ms,
                pending_tick_ms: config.pending_tick_ms,
                pending_label: "Sending",
                success_location: Some(config.success_location.clone()),
                success_redirect_delay_ms: config.success_redirect_delay_ms,
                timeout_redirect_delay_ms: config.timeout_redirect_delay_ms,
                fallback_delay_ms: config.fallback_delay_ms,
                native_fallback: true,
                messages: FormMessages {
                    success: "Message sent successfully!",
                    failure: "Something went wrong. Please try again.",
                    network: "Network error. Retrying with a standard form submission.",
                    timeout: "The server is taking longer than usual. Your message is most likely on its way.",
                    timeout_fallback: "Request timed out. Retrying with a standard form submission.",
                },
            },
            FormKind::Newsletter => Self {
                kind,
                timeout_ms: config.newsletter_timeout_ms,
                pending_tick_ms: config.pending_tick_ms,
                pending_label: "Subscribing",
                success_location: None,
                success_redirect_delay_ms: config.success_redirect_delay_ms,
                timeout_redirect_delay_ms: config.timeout_redirect_delay_ms,
                fallback_delay_ms: config.fallback_delay_ms,
                native_fallback: false,
                messages: FormMessages {
                    success: "Thanks for subscribing!",
                    failure: "Failed to subscribe. Please try again.",
                    network: "Failed to subscribe. Please try again.",
                    timeout: "Subscription request timed out. Please try again.",
                    timeout_fallback: "Subscription request timed out. Please try again.",
                },
            },
        }
    }
}

/// Label shown on the disabled submit control: "Sending", "Sending.", ...
pub fn pending_label(base: &str, tick: u32) -> String {
    format!("{base}{}", ".".repeat((tick % 4) as usize))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File { file_name: String, size: u64 },
}

/// Field values captured once at submit time, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    fields: Vec<(String, FieldValue)>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_files(&self) -> bool {
        self.fields
            .iter()
            .any(|(_, value)| matches!(value, FieldValue::File { .. }))
    }

    /// First text value recorded under `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(field, value)| match value {
            FieldValue::Text(text) if field == name => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub redirected: bool,
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    Redirect { location: String },
    Structured { success: bool, message: Option<String> },
    Markup { html: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("server responded with status {status}")]
    HttpStatus { status: u16 },
    #[error("structured response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct StructuredBody {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
}

pub fn is_structured_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Structured bodies are honoured on any status, since the server reports
/// logical failures as JSON with 4xx codes. Other non-2xx responses are
/// transport failures.
pub fn classify_response(raw: &RawResponse) -> Result<ResponsePayload, ClassifyError> {
    if raw.redirected {
        return Ok(ResponsePayload::Redirect {
            location: raw.url.clone(),
        });
    }

    if is_structured_content_type(raw.content_type.as_deref()) {
        let body: StructuredBody = serde_json::from_str(&raw.body)
            .map_err(|error| ClassifyError::Decode(error.to_string()))?;
        let message = non_blank(body.message)
            .or_else(|| body.errors.as_ref().and_then(first_field_error));
        return Ok(ResponsePayload::Structured {
            success: body.success,
            message,
        });
    }

    if !(200..=299).contains(&raw.status) {
        return Err(ClassifyError::HttpStatus { status: raw.status });
    }

    Ok(ResponsePayload::Markup {
        html: raw.body.clone(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Django renders form errors as `{field: ["message", ...]}` or, through
/// `get_json_data`, as `{field: [{"message": ...}]}`.
fn first_field_error(errors: &Value) -> Option<String> {
    match errors {
        Value::String(text) => non_blank(Some(text.clone())),
        Value::Array(items) => items.iter().find_map(first_field_error),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(text)) => non_blank(Some(text.clone())),
            _ => map.values().find_map(first_field_error),
        },
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Response(RawResponse),
    /// The cancellation timer aborted the request.
    TimedOut,
    NetworkError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Pending,
    Redirected { location: String },
    Success { message: String },
    LogicalFailure { message: String },
    ServerRendered { html: String },
    TimedOut,
    NetworkFailure { message: String },
}

impl SubmissionOutcome {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Redirected { .. } => "redirected",
            Self::Success { .. } => "success",
            Self::LogicalFailure { .. } => "logical_failure",
            Self::ServerRendered { .. } => "server_rendered",
            Self::TimedOut => "timed_out",
            Self::NetworkFailure { .. } => "network_failure",
        }
    }
}

pub fn resolve_outcome(event: &TransportEvent, policy: &FormPolicy) -> SubmissionOutcome {
    match event {
        TransportEvent::TimedOut => SubmissionOutcome::TimedOut,
        TransportEvent::NetworkError { message } => SubmissionOutcome::NetworkFailure {
            message: message.clone(),
        },
        TransportEvent::Response(raw) => match classify_response(raw) {
            Ok(ResponsePayload::Redirect { location }) => {
                SubmissionOutcome::Redirected { location }
            }
            Ok(ResponsePayload::Structured {
                success: true,
                message,
            }) => SubmissionOutcome::Success {
                message: message.unwrap_or_else(|| policy.messages.success.to_string()),
            },
            Ok(ResponsePayload::Structured {
                success: false,
                message,
            }) => SubmissionOutcome::LogicalFailure {
                message: message.unwrap_or_else(|| policy.messages.failure.to_string()),
            },
            Ok(ResponsePayload::Markup { html }) => SubmissionOutcome::ServerRendered { html },
            Err(error) => SubmissionOutcome::NetworkFailure {
                message: error.to_string(),
            },
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Loopback,
    Remote,
}

impl HostKind {
    pub fn from_hostname(hostname: &str, config: &SiteConfig) -> Self {
        if config.is_loopback_host(hostname) {
            Self::Loopback
        } else {
            Self::Remote
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    Notify {
        kind: NotificationKind,
        message: String,
    },
    ResetForm,
    ReplaceFormContents {
        html: String,
    },
    RestoreSubmitControl,
    /// A zero delay navigates immediately.
    Navigate {
        location: String,
        delay_ms: u32,
    },
    NativeSubmit {
        delay_ms: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMutation {
    Navigation,
    InlineReplacement,
    ReEnabledForm,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectPlan {
    pub effects: Vec<UiEffect>,
}

impl EffectPlan {
    /// The one mutation that ends the attempt from the user's point of view.
    pub fn terminal(&self) -> Option<TerminalMutation> {
        let navigates = self.effects.iter().any(|effect| {
            matches!(
                effect,
                UiEffect::Navigate { .. } | UiEffect::NativeSubmit { .. }
            )
        });
        if navigates {
            return Some(TerminalMutation::Navigation);
        }
        if self
            .effects
            .iter()
            .any(|effect| matches!(effect, UiEffect::ReplaceFormContents { .. }))
        {
            return Some(TerminalMutation::InlineReplacement);
        }
        if self
            .effects
            .iter()
            .any(|effect| matches!(effect, UiEffect::RestoreSubmitControl))
        {
            return Some(TerminalMutation::ReEnabledForm);
        }
        None
    }

    pub fn notifications(&self) -> usize {
        self.effects
            .iter()
            .filter(|effect| matches!(effect, UiEffect::Notify { .. }))
            .count()
    }
}

pub fn plan_effects(outcome: &SubmissionOutcome, policy: &FormPolicy, host: HostKind) -> EffectPlan {
    let notify = |kind: NotificationKind, message: &str| UiEffect::Notify {
        kind,
        message: message.to_string(),
    };

    let effects = match outcome {
        SubmissionOutcome::Pending => Vec::new(),
        SubmissionOutcome::Redirected { location } => match host {
            HostKind::Loopback => vec![
                notify(NotificationKind::Success, policy.messages.success),
                UiEffect::Navigate {
                    location: location.clone(),
                    delay_ms: policy.success_redirect_delay_ms,
                },
            ],
            HostKind::Remote => vec![UiEffect::Navigate {
                location: location.clone(),
                delay_ms: 0,
            }],
        },
        SubmissionOutcome::Success { message } => {
            let mut effects = vec![
                notify(NotificationKind::Success, message.as_str()),
                UiEffect::ResetForm,
            ];
            match policy.success_location.as_ref() {
                Some(location) => effects.push(UiEffect::Navigate {
                    location: location.clone(),
                    delay_ms: policy.success_redirect_delay_ms,
                }),
                None => effects.push(UiEffect::RestoreSubmitControl),
            }
            effects
        }
        SubmissionOutcome::LogicalFailure { message } => vec![
            notify(NotificationKind::Error, message.as_str()),
            UiEffect::RestoreSubmitControl,
        ],
        // The replacement markup brings its own submit control.
        SubmissionOutcome::ServerRendered { html } => {
            vec![UiEffect::ReplaceFormContents { html: html.clone() }]
        }
        SubmissionOutcome::TimedOut => {
            match (host, policy.native_fallback, policy.success_location.as_ref()) {
                (HostKind::Loopback, true, _) => vec![
                    notify(NotificationKind::Warning, policy.messages.timeout_fallback),
                    UiEffect::NativeSubmit {
                        delay_ms: policy.fallback_delay_ms,
                    },
                ],
                (HostKind::Remote, _, Some(location)) => vec![
                    notify(NotificationKind::Warning, policy.messages.timeout),
                    UiEffect::Navigate {
                        location: location.clone(),
                        delay_ms: policy.timeout_redirect_delay_ms,
                    },
                ],
                _ => vec![
                    notify(NotificationKind::Warning, policy.messages.timeout),
                    UiEffect::RestoreSubmitControl,
                ],
            }
        }
        SubmissionOutcome::NetworkFailure { .. } => {
            let mut effects = vec![
                notify(NotificationKind::Error, policy.messages.network),
                UiEffect::RestoreSubmitControl,
            ];
            if policy.native_fallback {
                effects.push(UiEffect::NativeSubmit {
                    delay_ms: policy.fallback_delay_ms,
                });
            }
            effects
        }
    };

    EffectPlan { effects }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("a {0} submission is already in flight")]
    AlreadyPending(&'static str),
    #[error("no {0} submission is in flight")]
    NotPending(&'static str),
}

/// Lifecycle of one form's background submission.
///
/// `settle` accepts only the first transport event after `begin`, so a
/// response racing the cancellation timer is dropped rather than handled
/// twice.
#[derive(Debug, Clone)]
pub struct SubmissionAttempt {
    kind: FormKind,
    phase: AttemptPhase,
    outcome: Option<SubmissionOutcome>,
    attempts: u64,
}

impl SubmissionAttempt {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            phase: AttemptPhase::Idle,
            outcome: None,
            attempts: 0,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn is_pending(&self) -> bool {
        self.phase == AttemptPhase::Pending
    }

    pub fn outcome(&self) -> SubmissionOutcome {
        self.outcome.clone().unwrap_or(SubmissionOutcome::Pending)
    }

    pub fn begin(&mut self) -> Result<(), SubmissionError> {
        if self.is_pending() {
            return Err(SubmissionError::AlreadyPending(self.kind.as_str()));
        }
        self.phase = AttemptPhase::Pending;
        self.outcome = None;
        self.attempts = self.attempts.saturating_add(1);
        tracing::debug!(form = self.kind.as_str(), attempt = self.attempts, "submission pending");
        Ok(())
    }

    pub fn settle(
        &mut self,
        event: &TransportEvent,
        policy: &FormPolicy,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        if !self.is_pending() {
            return Err(SubmissionError::NotPending(self.kind.as_str()));
        }
        let outcome = resolve_outcome(event, policy);
        self.phase = match &outcome {
            SubmissionOutcome::Pending => AttemptPhase::Pending,
            // The server answered; rendered markup carries its own state.
            SubmissionOutcome::Redirected { .. }
            | SubmissionOutcome::Success { .. }
            | SubmissionOutcome::ServerRendered { .. } => AttemptPhase::Succeeded,
            SubmissionOutcome::LogicalFailure { .. } | SubmissionOutcome::NetworkFailure { .. } => {
                AttemptPhase::Failed
            }
            SubmissionOutcome::TimedOut => AttemptPhase::TimedOut,
        };
        tracing::debug!(
            form = self.kind.as_str(),
            outcome = outcome.label(),
            "submission settled"
        );
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> FormPolicy {
        FormPolicy::for_kind(FormKind::Contact, &SiteConfig::default())
    }

    fn newsletter() -> FormPolicy {
        FormPolicy::for_kind(FormKind::Newsletter, &SiteConfig::default())
    }

    fn json_response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            redirected: false,
            url: "http://localhost:8000/contact/".to_string(),
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.to_string(),
        }
    }

    fn html_response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            redirected: false,
            url: "https://example.test/contact/".to_string(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.to_string(),
        }
    }

    #[test]
    fn policies_carry_form_specific_timeouts() {
        assert_eq!(contact().timeout_ms, 30_000);
        assert_eq!(newsletter().timeout_ms, 10_000);
        assert!(contact().native_fallback);
        assert!(!newsletter().native_fallback);
    }

    #[test]
    fn pending_label_cycles_dots() {
        let labels: Vec<String> = (0..5).map(|tick| pending_label("Sending", tick)).collect();
        assert_eq!(
            labels,
            vec!["Sending", "Sending.", "Sending..", "Sending...", "Sending"]
        );
    }

    #[test]
    fn snapshot_keeps_order_and_reads_text() {
        let mut snapshot = FormSnapshot::new();
        snapshot.push("name", FieldValue::Text("Ada".to_string()));
        snapshot.push(
            "attachment",
            FieldValue::File {
                file_name: "cv.pdf".to_string(),
                size: 1_024,
            },
        );
        snapshot.push("name", FieldValue::Text("second".to_string()));

        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.has_files());
        assert_eq!(snapshot.text("name"), Some("Ada"));
        assert_eq!(snapshot.text("attachment"), None);
        assert_eq!(snapshot.fields()[1].0, "attachment");
    }

    #[test]
    fn classifies_redirect_before_content_type() {
        let mut raw = json_response(200, "{}");
        raw.redirected = true;
        raw.url = "https://example.test/contact/success/".to_string();
        assert_eq!(
            classify_response(&raw),
            Ok(ResponsePayload::Redirect {
                location: "https://example.test/contact/success/".to_string()
            })
        );
    }

    #[test]
    fn classifies_structured_failure_with_field_errors() {
        let raw = json_response(
            400,
            r#"{"success": false, "errors": {"email": ["Enter a valid email address."]}}"#,
        );
        assert_eq!(
            classify_response(&raw),
            Ok(ResponsePayload::Structured {
                success: false,
                message: Some("Enter a valid email address.".to_string())
            })
        );
    }

    #[test]
    fn classifies_markup_and_rejects_failed_markup() {
        assert_eq!(
            classify_response(&html_response(200, "<p>Thanks!</p>")),
            Ok(ResponsePayload::Markup {
                html: "<p>Thanks!</p>".to_string()
            })
        );
        assert_eq!(
            classify_response(&html_response(502, "<h1>Bad gateway</h1>")),
            Err(ClassifyError::HttpStatus { status: 502 })
        );
    }

    #[test]
    fn undecodable_json_is_a_decode_error() {
        let error = classify_response(&json_response(200, "<html>")).expect_err("decode");
        assert!(matches!(error, ClassifyError::Decode(_)));
    }

    #[test]
    fn structured_content_type_detection() {
        assert!(is_structured_content_type(Some("application/json")));
        assert!(is_structured_content_type(Some("Application/JSON; charset=utf-8")));
        assert!(is_structured_content_type(Some("application/problem+json")));
        assert!(!is_structured_content_type(Some("text/html")));
        assert!(!is_structured_content_type(None));
    }

    #[test]
    fn success_without_message_uses_policy_default() {
        let outcome = resolve_outcome(
            &TransportEvent::Response(json_response(200, r#"{"success": true}"#)),
            &contact(),
        );
        assert_eq!(
            outcome,
            SubmissionOutcome::Success {
                message: "Message sent successfully!".to_string()
            }
        );
    }

    #[test]
    fn contact_success_resets_and_navigates_after_delay() {
        let plan = plan_effects(
            &SubmissionOutcome::Success {
                message: "Thanks".to_string(),
            },
            &contact(),
            HostKind::Remote,
        );
        assert_eq!(
            plan.effects,
            vec![
                UiEffect::Notify {
                    kind: NotificationKind::Success,
                    message: "Thanks".to_string()
                },
                UiEffect::ResetForm,
                UiEffect::Navigate {
                    location: "/contact/success/".to_string(),
                    delay_ms: 1_500
                },
            ]
        );
    }

    #[test]
    fn redirect_is_immediate_on_remote_hosts_and_announced_on_loopback() {
        let outcome = SubmissionOutcome::Redirected {
            location: "/contact/success/".to_string(),
        };
        let remote = plan_effects(&outcome, &contact(), HostKind::Remote);
        assert_eq!(
            remote.effects,
            vec![UiEffect::Navigate {
                location: "/contact/success/".to_string(),
                delay_ms: 0
            }]
        );

        let local = plan_effects(&outcome, &contact(), HostKind::Loopback);
        assert_eq!(local.notifications(), 1);
        assert!(local.effects.contains(&UiEffect::Navigate {
            location: "/contact/success/".to_string(),
            delay_ms: 1_500
        }));
    }

    #[test]
    fn contact_timeout_depends_on_host() {
        let local = plan_effects(&SubmissionOutcome::TimedOut, &contact(), HostKind::Loopback);
        assert!(local.effects.contains(&UiEffect::NativeSubmit { delay_ms: 2_000 }));
        assert!(
            !local
                .effects
                .iter()
                .any(|effect| matches!(effect, UiEffect::Navigate { .. }))
        );

        let remote = plan_effects(&SubmissionOutcome::TimedOut, &contact(), HostKind::Remote);
        assert!(remote.effects.contains(&UiEffect::Navigate {
            location: "/contact/success/".to_string(),
            delay_ms: 3_000
        }));
        assert!(
            remote
                .effects
                .iter()
                .all(|effect| !matches!(effect, UiEffect::NativeSubmit { .. }))
        );
    }

    #[test]
    fn network_failure_reenables_and_falls_back() {
        let plan = plan_effects(
            &SubmissionOutcome::NetworkFailure {
                message: "offline".to_string(),
            },
            &contact(),
            HostKind::Remote,
        );
        assert_eq!(
            plan.effects,
            vec![
                UiEffect::Notify {
                    kind: NotificationKind::Error,
                    message: "Network error. Retrying with a standard form submission."
                        .to_string()
                },
                UiEffect::RestoreSubmitControl,
                UiEffect::NativeSubmit { delay_ms: 2_000 },
            ]
        );
    }

    #[test]
    fn newsletter_never_navigates_on_its_own() {
        let policy = newsletter();
        for outcome in [
            SubmissionOutcome::Success {
                message: "ok".to_string(),
            },
            SubmissionOutcome::TimedOut,
            SubmissionOutcome::NetworkFailure {
                message: "offline".to_string(),
            },
        ] {
            for host in [HostKind::Loopback, HostKind::Remote] {
                let plan = plan_effects(&outcome, &policy, host);
                assert_eq!(plan.terminal(), Some(TerminalMutation::ReEnabledForm));
            }
        }
    }

    #[test]
    fn markup_replacement_leaves_control_to_the_markup() {
        let plan = plan_effects(
            &SubmissionOutcome::ServerRendered {
                html: "<p>error</p>".to_string(),
            },
            &contact(),
            HostKind::Remote,
        );
        assert_eq!(
            plan.effects,
            vec![UiEffect::ReplaceFormContents {
                html: "<p>error</p>".to_string()
            }]
        );
        assert_eq!(plan.terminal(), Some(TerminalMutation::InlineReplacement));
    }

    #[test]
    fn fresh_attempt_reports_pending_outcome_until_settled() {
        let policy = contact();
        let mut attempt = SubmissionAttempt::new(FormKind::Contact);
        attempt.begin().expect("begin");
        assert_eq!(attempt.outcome().label(), "pending");

        attempt
            .settle(&TransportEvent::TimedOut, &policy)
            .expect("timeout settles");
        assert_eq!(attempt.outcome().label(), "timed_out");
    }

    #[test]
    fn pending_plans_nothing() {
        let plan = plan_effects(&SubmissionOutcome::Pending, &contact(), HostKind::Remote);
        assert!(plan.effects.is_empty());
        assert_eq!(plan.terminal(), None);
    }

    #[test]
    fn attempt_rejects_double_submit_and_late_events() {
        let policy = contact();
        let mut attempt = SubmissionAttempt::new(FormKind::Contact);
        assert_eq!(attempt.phase(), AttemptPhase::Idle);
        assert_eq!(attempt.outcome(), SubmissionOutcome::Pending);

        attempt.begin().expect("first begin");
        assert_eq!(
            attempt.begin(),
            Err(SubmissionError::AlreadyPending("contact"))
        );

        let outcome = attempt
            .settle(&TransportEvent::TimedOut, &policy)
            .expect("timeout settles");
        assert_eq!(outcome, SubmissionOutcome::TimedOut);
        assert_eq!(attempt.phase(), AttemptPhase::TimedOut);

        let late = attempt.settle(
            &TransportEvent::NetworkError {
                message: "AbortError".to_string(),
            },
            &policy,
        );
        assert_eq!(late, Err(SubmissionError::NotPending("contact")));
        assert_eq!(attempt.outcome(), SubmissionOutcome::TimedOut);

        attempt.begin().expect("resubmit after settle");
        assert_eq!(attempt.attempts(), 2);
    }
}
