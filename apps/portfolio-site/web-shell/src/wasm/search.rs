use super::*;

pub(super) fn install_search(session: &UiSession) -> bool {
    let (Some(input), Some(results)) = (
        element_by_id::<HtmlInputElement>(SEARCH_INPUT_ID),
        element_by_id::<HtmlElement>(SEARCH_RESULTS_ID),
    ) else {
        return false;
    };

    let handler_session = session.clone();
    let source = input.clone();
    let panel = results.clone();
    listen(input.as_ref(), "input", move |_event| {
        on_search_input(&handler_session, &source.value(), &panel);
    });

    if let Some(document) = document() {
        listen(document.as_ref(), "click", move |event| {
            let target = event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::Node>().ok());
            let inside = |container: &web_sys::Node| container.contains(target.as_ref());
            if !inside(input.as_ref()) && !inside(results.as_ref()) {
                set_class(&results, SHOW_CLASS, false);
            }
        });
    }
    true
}

fn on_search_input(session: &UiSession, raw: &str, panel: &HtmlElement) {
    // Replacing the slot cancels the previous debounce timer.
    let action = session.with_state(|state| {
        state.search_timer = None;
        state.search.on_input(raw)
    });

    match action {
        SearchAction::Clear => {
            panel.set_inner_html("");
            set_class(panel, SHOW_CLASS, false);
        }
        SearchAction::Schedule {
            generation,
            query,
            url,
            delay_ms,
        } => {
            let timer_session = session.clone();
            let panel = panel.clone();
            let timer = Timeout::new(delay_ms, move || {
                if !timer_session.with_state(|state| state.search.is_current(generation)) {
                    return;
                }
                spawn_local(run_search(timer_session, panel, generation, query, url));
            });
            session.with_state(|state| state.search_timer = Some(timer));
        }
    }
}

async fn run_search(
    session: UiSession,
    panel: HtmlElement,
    generation: u64,
    query: String,
    url: String,
) {
    session.with_state(|state| {
        state.diagnostics.search_requests = state.diagnostics.search_requests.saturating_add(1);
    });
    tracing::debug!(query = %query, "search request");

    match fetch_search_fragment(&url).await {
        Ok(html) => {
            // A newer keystroke owns the panel now.
            let current = session.with_state(|state| state.search.generation());
            if current != generation {
                tracing::debug!(
                    query = %query,
                    generation,
                    current,
                    "discarding stale search results"
                );
                return;
            }
            panel.set_inner_html(&html);
            set_class(&panel, SHOW_CLASS, true);
        }
        Err(error) => tracing::warn!(%error, "search request failed"),
    }
}
