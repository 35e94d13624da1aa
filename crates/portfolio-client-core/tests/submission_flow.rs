use portfolio_client_core::config::SiteConfig;
use portfolio_client_core::csrf::{CSRF_FIELD_NAME, CsrfTokenSource, resolve_csrf_token};
use portfolio_client_core::notification::{NotificationKind, NotificationSurface};
use portfolio_client_core::submission::{
    AttemptPhase, FieldValue, FormKind, FormPolicy, FormSnapshot, HostKind, RawResponse,
    SubmissionAttempt, SubmissionOutcome, TerminalMutation, TransportEvent, UiEffect,
    plan_effects,
};

fn contact_snapshot(csrf_field: &str) -> FormSnapshot {
    let mut snapshot = FormSnapshot::new();
    snapshot.push(CSRF_FIELD_NAME, FieldValue::Text(csrf_field.to_string()));
    snapshot.push("name", FieldValue::Text("Grace".to_string()));
    snapshot.push("email", FieldValue::Text("grace@example.test".to_string()));
    snapshot.push("message", FieldValue::Text("Hello there".to_string()));
    snapshot
}

fn all_outcomes() -> Vec<SubmissionOutcome> {
    vec![
        SubmissionOutcome::Redirected {
            location: "/contact/success/".to_string(),
        },
        SubmissionOutcome::Success {
            message: "sent".to_string(),
        },
        SubmissionOutcome::LogicalFailure {
            message: "invalid".to_string(),
        },
        SubmissionOutcome::ServerRendered {
            html: "<form></form>".to_string(),
        },
        SubmissionOutcome::TimedOut,
        SubmissionOutcome::NetworkFailure {
            message: "offline".to_string(),
        },
    ]
}

#[test]
fn every_terminal_outcome_has_exactly_one_terminal_mutation() {
    let config = SiteConfig::default();
    for kind in [FormKind::Contact, FormKind::Newsletter] {
        let policy = FormPolicy::for_kind(kind, &config);
        for host in [HostKind::Loopback, HostKind::Remote] {
            for outcome in all_outcomes() {
                let plan = plan_effects(&outcome, &policy, host);
                assert!(
                    plan.terminal().is_some(),
                    "{kind:?}/{host:?}/{outcome:?} has no terminal mutation"
                );
                assert!(plan.notifications() <= 1);

                let navigations = plan
                    .effects
                    .iter()
                    .filter(|effect| {
                        matches!(
                            effect,
                            UiEffect::Navigate { .. } | UiEffect::NativeSubmit { .. }
                        )
                    })
                    .count();
                assert!(navigations <= 1, "{kind:?}/{host:?}/{outcome:?}");

                if plan.terminal() == Some(TerminalMutation::InlineReplacement) {
                    assert_eq!(plan.effects.len(), 1);
                }
            }
        }
    }
}

#[test]
fn contact_success_flow_uses_cookie_token_when_field_is_blank() {
    let config = SiteConfig::default();
    let policy = FormPolicy::for_kind(FormKind::Contact, &config);
    let snapshot = contact_snapshot("");

    let token = resolve_csrf_token(
        snapshot.text(CSRF_FIELD_NAME),
        Some("csrftoken=from-cookie; sessionid=s"),
    );
    assert_eq!(token.source, CsrfTokenSource::Cookie);
    assert_eq!(token.value, "from-cookie");

    let mut attempt = SubmissionAttempt::new(FormKind::Contact);
    attempt.begin().expect("begin");
    let outcome = attempt
        .settle(
            &TransportEvent::Response(RawResponse {
                status: 200,
                redirected: false,
                url: "https://portfolio.example.test/contact/".to_string(),
                content_type: Some("application/json".to_string()),
                body: r#"{"success": true, "message": "Thank you! Your message has been sent."}"#
                    .to_string(),
            }),
            &policy,
        )
        .expect("settle");
    assert_eq!(attempt.phase(), AttemptPhase::Succeeded);

    let host = HostKind::from_hostname("portfolio.example.test", &config);
    let plan = plan_effects(&outcome, &policy, host);
    assert_eq!(plan.terminal(), Some(TerminalMutation::Navigation));
    assert!(plan.effects.contains(&UiEffect::ResetForm));

    let mut surface = NotificationSurface::new(config.notifications.clone());
    for effect in &plan.effects {
        if let UiEffect::Notify { kind, message } = effect {
            let mount = surface.show(*kind, message);
            assert_eq!(mount.kind, NotificationKind::Success);
            assert_eq!(mount.auto_dismiss_ms, 4_000);
            assert_eq!(mount.message, "Thank you! Your message has been sent.");
        }
    }
}

#[test]
fn timeout_on_loopback_falls_back_exactly_once() {
    let config = SiteConfig::default();
    let policy = FormPolicy::for_kind(FormKind::Contact, &config);
    let host = HostKind::from_hostname("localhost", &config);
    let mut attempt = SubmissionAttempt::new(FormKind::Contact);
    attempt.begin().expect("begin");

    let mut fallbacks = 0;
    // The timer fires first, then the aborted fetch rejects.
    let events = [
        TransportEvent::TimedOut,
        TransportEvent::TimedOut,
        TransportEvent::NetworkError {
            message: "The user aborted a request.".to_string(),
        },
    ];
    for event in &events {
        let Ok(outcome) = attempt.settle(event, &policy) else {
            continue;
        };
        let plan = plan_effects(&outcome, &policy, host);
        fallbacks += plan
            .effects
            .iter()
            .filter(|effect| matches!(effect, UiEffect::NativeSubmit { .. }))
            .count();
    }

    assert_eq!(fallbacks, 1);
    assert_eq!(attempt.phase(), AttemptPhase::TimedOut);
}

#[test]
fn logical_failure_keeps_form_editable_without_fallback() {
    let config = SiteConfig::default();
    let policy = FormPolicy::for_kind(FormKind::Contact, &config);
    let mut attempt = SubmissionAttempt::new(FormKind::Contact);
    attempt.begin().expect("begin");

    let outcome = attempt
        .settle(
            &TransportEvent::Response(RawResponse {
                status: 400,
                redirected: false,
                url: "https://portfolio.example.test/contact/quick/".to_string(),
                content_type: Some("application/json".to_string()),
                body: r#"{"success": false, "errors": {"message": ["This field is required."]}}"#
                    .to_string(),
            }),
            &policy,
        )
        .expect("settle");
    assert_eq!(
        outcome,
        SubmissionOutcome::LogicalFailure {
            message: "This field is required.".to_string()
        }
    );
    assert_eq!(attempt.phase(), AttemptPhase::Failed);

    let plan = plan_effects(&outcome, &policy, HostKind::Remote);
    assert_eq!(plan.terminal(), Some(TerminalMutation::ReEnabledForm));
    assert!(
        plan.effects
            .iter()
            .all(|effect| !matches!(effect, UiEffect::NativeSubmit { .. }))
    );

    attempt.begin().expect("user may resubmit");
}
