use super::*;

pub(super) fn install_contact_form(session: &UiSession) -> bool {
    install_background_form(session, CONTACT_FORM_ID, FormKind::Contact)
}

pub(super) fn install_newsletter_form(session: &UiSession) -> bool {
    install_background_form(session, NEWSLETTER_FORM_ID, FormKind::Newsletter)
}

fn install_background_form(session: &UiSession, form_id: &str, kind: FormKind) -> bool {
    let Some(form) = element_by_id::<HtmlFormElement>(form_id) else {
        return false;
    };
    let config = session.config();
    session.with_state(|state| {
        state.forms.insert(kind, FormSession::new(kind, &config));
    });

    let handler_session = session.clone();
    let target = form.clone();
    listen(form.as_ref(), "submit", move |event| {
        event.prevent_default();
        handle_submit(&handler_session, &target, kind);
    });
    true
}

/// Bootstrap-style gate for forms that submit natively.
pub(super) fn install_validation_gates(_session: &UiSession) -> bool {
    let Some(document) = document() else {
        return false;
    };
    let mut attached = false;
    for form in query_all::<HtmlFormElement>(&document, VALIDATED_FORM_SELECTOR) {
        let id = form.id();
        if id == CONTACT_FORM_ID || id == NEWSLETTER_FORM_ID {
            continue;
        }
        let target = form.clone();
        listen(form.as_ref(), "submit", move |event| {
            if !target.check_validity() {
                event.prevent_default();
                event.stop_propagation();
            }
            set_class(&target, WAS_VALIDATED_CLASS, true);
        });
        attached = true;
    }
    attached
}

fn handle_submit(session: &UiSession, form: &HtmlFormElement, kind: FormKind) {
    set_class(form, WAS_VALIDATED_CLASS, true);
    if !form.check_validity() {
        let _ = form.report_validity();
        return;
    }

    let began = session.with_state(|state| {
        let result = state.forms.get_mut(&kind).map(|form_session| {
            form_session
                .attempt
                .begin()
                .map(|()| form_session.attempt.outcome())
        });
        if let Some(Ok(outcome)) = &result {
            state.diagnostics.last_outcome = Some(outcome.label().to_string());
        }
        result
    });
    match began {
        Some(Ok(_)) => {}
        Some(Err(error)) => {
            tracing::debug!(%error, "ignoring repeated submit");
            return;
        }
        None => return,
    }

    let form_data = match web_sys::FormData::new_with_form(form) {
        Ok(form_data) => form_data,
        Err(_) => {
            record_error(session, "failed to read form fields");
            let event = TransportEvent::NetworkError {
                message: "form data unavailable".to_string(),
            };
            settle_and_apply(session, form, kind, &event, SubmitControl::inert());
            return;
        }
    };

    let snapshot = capture_form_snapshot(&form_data);
    let csrf = resolve_csrf_token(snapshot.text(CSRF_FIELD_NAME), document_cookie().as_deref());
    if csrf.is_missing() {
        tracing::warn!(form = kind.as_str(), "no CSRF token in form or cookie");
    }
    if snapshot.is_empty() {
        tracing::warn!(form = kind.as_str(), "form has no named fields");
    }
    tracing::info!(
        form = kind.as_str(),
        fields = snapshot.len(),
        has_files = snapshot.has_files(),
        csrf_source = ?csrf.source,
        "submitting form in background"
    );
    session.with_state(|state| {
        state.diagnostics.submissions_total = state.diagnostics.submissions_total.saturating_add(1);
    });

    let session = session.clone();
    let form = form.clone();
    spawn_local(async move {
        run_submission(session, form, kind, form_data, csrf).await;
    });
}

/// Submit button held disabled with an animated label while a request is
/// in flight.
struct SubmitControl {
    button: Option<HtmlElement>,
    original_html: String,
    ticker: Option<Interval>,
}

impl SubmitControl {
    fn inert() -> Self {
        Self {
            button: None,
            original_html: String::new(),
            ticker: None,
        }
    }

    fn engage(form: &HtmlFormElement, label: &'static str, tick_ms: u32) -> Self {
        let button = form
            .query_selector(SUBMIT_CONTROL_SELECTOR)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        let Some(button) = button else {
            return Self::inert();
        };

        let original_html = button.inner_html();
        let _ = button.set_attribute("disabled", "");
        button.set_inner_text(&pending_label(label, 0));

        let ticking = button.clone();
        let mut tick = 0_u32;
        let ticker = Interval::new(tick_ms, move || {
            tick = tick.wrapping_add(1);
            ticking.set_inner_text(&pending_label(label, tick));
        });

        Self {
            button: Some(button),
            original_html,
            ticker: Some(ticker),
        }
    }

    fn stop_ticking(&mut self) {
        self.ticker.take();
    }

    fn restore(mut self) {
        self.stop_ticking();
        if let Some(button) = self.button.take() {
            button.set_inner_html(&self.original_html);
            let _ = button.remove_attribute("disabled");
        }
    }
}

async fn run_submission(
    session: UiSession,
    form: HtmlFormElement,
    kind: FormKind,
    form_data: web_sys::FormData,
    csrf: CsrfToken,
) {
    let Some(policy) = session.with_state(|state| {
        state
            .forms
            .get(&kind)
            .map(|form_session| form_session.policy.clone())
    }) else {
        return;
    };
    let mut control = SubmitControl::engage(&form, policy.pending_label, policy.pending_tick_ms);
    let action = form.action();
    let controller = web_sys::AbortController::new().ok();
    let signal = controller.as_ref().map(web_sys::AbortController::signal);

    let event = {
        let request = send_form_submission(&action, form_data, &csrf, signal.as_ref()).fuse();
        let timeout = sleep(Duration::from_millis(u64::from(policy.timeout_ms))).fuse();
        pin_mut!(request, timeout);
        select! {
            result = request => match result {
                Ok(raw) => TransportEvent::Response(raw),
                Err(error) => {
                    tracing::warn!(form = kind.as_str(), %error, "background submission failed");
                    error.into_event()
                }
            },
            _ = timeout => {
                tracing::warn!(form = kind.as_str(), timeout_ms = policy.timeout_ms, "background submission timed out");
                if let Some(controller) = controller.as_ref() {
                    controller.abort();
                }
                TransportEvent::TimedOut
            },
        }
    };

    control.stop_ticking();
    settle_and_apply(&session, &form, kind, &event, control);
}

fn settle_and_apply(
    session: &UiSession,
    form: &HtmlFormElement,
    kind: FormKind,
    event: &TransportEvent,
    control: SubmitControl,
) {
    let settled = session.with_state(|state| {
        let form_session = state.forms.get_mut(&kind)?;
        let result = form_session.attempt.settle(event, &form_session.policy);
        Some((result, form_session.policy.clone()))
    });
    let Some((result, policy)) = settled else {
        return;
    };
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(error) => {
            tracing::debug!(%error, "dropping late transport event");
            return;
        }
    };

    let host = host_kind(&session.config());
    let plan = plan_effects(&outcome, &policy, host);
    tracing::info!(
        form = kind.as_str(),
        outcome = outcome.label(),
        terminal = ?plan.terminal(),
        "submission settled"
    );
    session.with_state(|state| {
        state.diagnostics.last_outcome = Some(outcome.label().to_string());
        if plan
            .effects
            .iter()
            .any(|effect| {
                matches!(effect, UiEffect::Notify { kind: notice, .. } if *notice != NotificationKind::Success)
            })
        {
            state.diagnostics.submission_failures =
                state.diagnostics.submission_failures.saturating_add(1);
        }
    });

    apply_effects(session, form, plan.effects, control);
}

fn apply_effects(
    session: &UiSession,
    form: &HtmlFormElement,
    effects: Vec<UiEffect>,
    control: SubmitControl,
) {
    let mut control = Some(control);
    for effect in effects {
        match effect {
            UiEffect::Notify { kind, message } => session.notify(kind, &message),
            UiEffect::ResetForm => {
                form.reset();
                set_class(form, WAS_VALIDATED_CLASS, false);
            }
            UiEffect::ReplaceFormContents { html } => {
                control.take();
                form.set_inner_html(&html);
            }
            UiEffect::RestoreSubmitControl => {
                if let Some(control) = control.take() {
                    control.restore();
                }
            }
            UiEffect::Navigate { location, delay_ms } => {
                after_delay(delay_ms, move || navigate_to(&location));
            }
            UiEffect::NativeSubmit { delay_ms } => {
                let form = form.clone();
                after_delay(delay_ms, move || {
                    tracing::info!("falling back to native form submission");
                    if form.submit().is_err() {
                        tracing::error!("native form submission failed");
                    }
                });
            }
        }
    }
}
