use super::*;

use portfolio_client_core::theme::toggle_theme as toggle_persisted_theme;

thread_local! {
    static VIEWPORT_OBSERVERS: RefCell<Vec<ViewportObserver>> = const { RefCell::new(Vec::new()) };
}

struct ViewportObserver {
    _observer: web_sys::IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>,
}

struct LocalThemeStore;

impl ThemeStore for LocalThemeStore {
    type Error = String;

    fn load_theme(&self) -> Result<Option<String>, Self::Error> {
        local_storage()?
            .get_item(THEME_STORAGE_KEY)
            .map_err(|_| "failed to read theme preference".to_string())
    }

    fn persist_theme(&self, theme: Theme) -> Result<(), Self::Error> {
        local_storage()?
            .set_item(THEME_STORAGE_KEY, theme.as_str())
            .map_err(|_| "failed to write theme preference".to_string())
    }
}

fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .ok_or_else(|| "window is unavailable".to_string())?
        .local_storage()
        .map_err(|_| "local storage is blocked".to_string())?
        .ok_or_else(|| "local storage is unavailable".to_string())
}

fn set_theme_attribute(theme: Theme) {
    let Some(root) = document().and_then(|document| document.document_element()) else {
        return;
    };
    let _ = root.set_attribute(THEME_ATTRIBUTE, theme.as_str());
}

fn current_theme_attribute() -> Option<String> {
    document()?.document_element()?.get_attribute(THEME_ATTRIBUTE)
}

pub(super) fn apply_initial_theme() -> Theme {
    let (theme, source) = load_initial_theme(&LocalThemeStore, || media_matches(DARK_SCHEME_QUERY));
    set_theme_attribute(theme);
    tracing::debug!(theme = theme.as_str(), source = ?source, "initial theme applied");
    theme
}

pub(super) fn apply_toggled_theme() -> Theme {
    let next = toggle_persisted_theme(&LocalThemeStore, current_theme_attribute().as_deref());
    set_theme_attribute(next);
    broadcast_theme_change(next);
    next
}

/// Fires `themechange` on the window with `{ theme }` as detail.
fn broadcast_theme_change(theme: Theme) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let detail = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &detail,
        &JsValue::from_str("theme"),
        &JsValue::from_str(theme.as_str()),
    );
    let init = web_sys::CustomEventInit::new();
    init.set_detail(&detail);
    match web_sys::CustomEvent::new_with_event_init_dict(THEME_CHANGE_EVENT, &init) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(_) => tracing::warn!("failed to create theme change event"),
    }
}

pub(super) fn install_theme_toggle(_session: &UiSession) -> bool {
    let Some(toggle) = element_by_id::<HtmlElement>(THEME_TOGGLE_ID) else {
        return false;
    };
    listen(toggle.as_ref(), "click", move |_event| {
        let theme = apply_toggled_theme();
        tracing::info!(theme = theme.as_str(), "theme toggled");
    });
    true
}

/// Everything driven by the window scroll position.
struct ScrollEffects {
    navbar: Option<HtmlElement>,
    scroll_to_top: Option<HtmlElement>,
    progress: Option<HtmlElement>,
    parallax: Vec<(HtmlElement, f64)>,
    skill_bars: Vec<HtmlElement>,
    skill_trigger: OnceTrigger,
    thresholds: portfolio_client_core::config::ScrollThresholds,
    skill_bar_restore_delay_ms: u32,
}

impl ScrollEffects {
    fn is_empty(&self) -> bool {
        self.navbar.is_none()
            && self.scroll_to_top.is_none()
            && self.progress.is_none()
            && self.parallax.is_empty()
            && self.skill_bars.is_empty()
    }

    fn sync_position(&self) {
        let position = scroll_y();
        if let Some(navbar) = &self.navbar {
            set_class(navbar, SCROLLED_CLASS, navbar_is_scrolled(position, &self.thresholds));
        }
        if let Some(button) = &self.scroll_to_top {
            set_class(button, VISIBLE_CLASS, scroll_to_top_visible(position, &self.thresholds));
        }
        if let Some(bar) = &self.progress {
            let scroll_height = document()
                .and_then(|document| document.document_element())
                .map(|root| f64::from(root.scroll_height()))
                .unwrap_or(0.0);
            let percent = reading_progress_percent(position, scroll_height, viewport_height());
            let _ = bar.style().set_property("width", &progress_width_css(percent));
        }
        for (element, speed) in &self.parallax {
            let _ = element
                .style()
                .set_property("transform", &parallax_transform(position, *speed));
        }
    }

    fn on_scroll(&mut self) {
        self.sync_position();
        if !self.skill_bars.is_empty() && self.skill_trigger.fire() {
            replay_visible_skill_bars(&self.skill_bars, self.skill_bar_restore_delay_ms);
        }
    }
}

pub(super) fn install_scroll_effects(session: &UiSession) -> bool {
    let (Some(window), Some(document)) = (web_sys::window(), document()) else {
        return false;
    };
    let config = session.config();
    let parallax = if media_matches(REDUCED_MOTION_QUERY) {
        Vec::new()
    } else {
        query_all::<HtmlElement>(&document, PARALLAX_SELECTOR)
            .into_iter()
            .map(|element| {
                let speed = parse_parallax_speed(
                    element.get_attribute("data-speed").as_deref(),
                    config.default_parallax_speed,
                );
                (element, speed)
            })
            .collect()
    };

    let mut effects = ScrollEffects {
        navbar: element_by_id(NAVBAR_ID),
        scroll_to_top: element_by_id(SCROLL_TO_TOP_ID),
        progress: element_by_id(READING_PROGRESS_ID),
        parallax,
        skill_bars: query_all(&document, SKILL_BAR_SELECTOR),
        skill_trigger: OnceTrigger::default(),
        thresholds: config.scroll.clone(),
        skill_bar_restore_delay_ms: config.skill_bar_restore_delay_ms,
    };
    if effects.is_empty() {
        return false;
    }

    effects.sync_position();
    listen_passive(window.as_ref(), "scroll", move |_event| effects.on_scroll());
    true
}

/// Collapses visible skill bars to zero width and restores them so the CSS
/// transition replays.
fn replay_visible_skill_bars(bars: &[HtmlElement], restore_delay_ms: u32) {
    let viewport = viewport_height();
    for bar in bars {
        let rect = bar.get_bounding_client_rect();
        if !intersects_viewport(rect.top(), rect.bottom(), viewport) {
            continue;
        }
        let style = bar.style();
        let width = style.get_property_value("width").unwrap_or_default();
        let _ = style.set_property("width", "0");
        let bar = bar.clone();
        after_delay(restore_delay_ms, move || {
            let _ = bar.style().set_property("width", &width);
        });
    }
}

pub(super) fn install_scroll_to_top(_session: &UiSession) -> bool {
    let Some(button) = element_by_id::<HtmlElement>(SCROLL_TO_TOP_ID) else {
        return false;
    };
    listen(button.as_ref(), "click", |_event| smooth_scroll_to(0.0));
    true
}

pub(super) fn install_anchor_scroll(_session: &UiSession) -> bool {
    let Some(document) = document() else {
        return false;
    };
    let anchors = query_all::<web_sys::Element>(&document, ANCHOR_LINK_SELECTOR);
    if anchors.is_empty() {
        return false;
    }
    for anchor in anchors {
        let link = anchor.clone();
        let page = document.clone();
        listen(anchor.as_ref(), "click", move |event| {
            let Some(href) = link.get_attribute("href") else {
                return;
            };
            if !is_in_page_anchor(&href) {
                return;
            }
            let target = page
                .query_selector(&href)
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into::<HtmlElement>().ok());
            let Some(target) = target else {
                return;
            };
            event.prevent_default();
            let navbar_height = element_by_id::<HtmlElement>(NAVBAR_ID)
                .map(|navbar| f64::from(navbar.offset_height()))
                .unwrap_or(0.0);
            smooth_scroll_to(anchor_scroll_top(f64::from(target.offset_top()), navbar_height));
            close_mobile_menu();
        });
    }
    true
}

pub(super) fn install_mobile_menu_close(_session: &UiSession) -> bool {
    let Some(document) = document() else {
        return false;
    };
    let links = query_all::<web_sys::Element>(&document, NAV_LINK_SELECTOR);
    if links.is_empty() {
        return false;
    }
    for link in links {
        listen(link.as_ref(), "click", |_event| close_mobile_menu());
    }
    true
}

pub(super) fn install_viewport_reveals(session: &UiSession) -> bool {
    let Some(document) = document() else {
        return false;
    };
    let counters = query_all::<web_sys::Element>(&document, COUNTER_SELECTOR);
    let images = query_all::<web_sys::Element>(&document, LAZY_IMAGE_SELECTOR);
    if counters.is_empty() && images.is_empty() {
        return false;
    }

    let observers_supported = window_has("IntersectionObserver");
    if !images.is_empty() {
        if observers_supported {
            if let Err(error) = observe_once(&images, load_lazy_image) {
                record_error(session, &error);
                images.iter().for_each(load_lazy_image);
            }
        } else {
            images.iter().for_each(load_lazy_image);
        }
    }

    // Counters keep their server-rendered value without an observer.
    if !counters.is_empty() && observers_supported {
        let config = session.config();
        let (duration_ms, frame_ms) = (config.counter_duration_ms, config.counter_frame_ms);
        if let Err(error) = observe_once(&counters, move |counter| {
            animate_counter(counter.clone(), duration_ms, frame_ms);
        }) {
            record_error(session, &error);
        }
    }
    true
}

/// Calls `on_visible` the first time each target enters the viewport, then
/// stops observing it.
fn observe_once(
    targets: &[web_sys::Element],
    on_visible: impl Fn(&web_sys::Element) + 'static,
) -> Result<(), String> {
    let callback = Closure::<dyn FnMut(js_sys::Array, web_sys::IntersectionObserver)>::wrap(
        Box::new(
            move |entries: js_sys::Array, observer: web_sys::IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<web_sys::IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    observer.unobserve(&target);
                    on_visible(&target);
                }
            },
        ),
    );
    let observer = web_sys::IntersectionObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|_| "failed to create intersection observer".to_string())?;
    for target in targets {
        observer.observe(target);
    }
    VIEWPORT_OBSERVERS.with(|observers| {
        observers.borrow_mut().push(ViewportObserver {
            _observer: observer,
            _callback: callback,
        });
    });
    Ok(())
}

fn load_lazy_image(element: &web_sys::Element) {
    let Some(source) = element.get_attribute("data-src") else {
        return;
    };
    match element.dyn_ref::<web_sys::HtmlImageElement>() {
        Some(image) => image.set_src(&source),
        None => {
            let _ = element.set_attribute("src", &source);
        }
    }
    let _ = element.remove_attribute("data-src");
}

fn animate_counter(counter: web_sys::Element, duration_ms: u32, frame_ms: u32) {
    let target = counter
        .get_attribute("data-target")
        .as_deref()
        .and_then(parse_counter_target);
    let Some(target) = target else {
        return;
    };
    step_counter(counter, CounterAnimation::new(target, duration_ms, frame_ms));
}

fn step_counter(counter: web_sys::Element, mut animation: CounterAnimation) {
    match animation.next_frame() {
        CounterFrame::Continue(value) => {
            counter.set_text_content(Some(&value.to_string()));
            request_animation_frame_once(move || step_counter(counter, animation));
        }
        CounterFrame::Done(value) => counter.set_text_content(Some(&value.to_string())),
    }
}

pub(super) fn install_project_filter(_session: &UiSession) -> bool {
    let Some(document) = document() else {
        return false;
    };
    let filters = Rc::new(query_all::<HtmlElement>(&document, PROJECT_FILTER_SELECTOR));
    let cards = Rc::new(query_all::<HtmlElement>(&document, PROJECT_CARD_SELECTOR));
    if filters.is_empty() || cards.is_empty() {
        return false;
    }

    for button in filters.iter() {
        let selected = button.clone();
        let filters = Rc::clone(&filters);
        let cards = Rc::clone(&cards);
        listen(button.as_ref(), "click", move |_event| {
            let filter =
                ProjectFilter::from_attribute(selected.get_attribute("data-filter").as_deref());
            for other in filters.iter() {
                set_class(other, ACTIVE_CLASS, false);
            }
            set_class(&selected, ACTIVE_CLASS, true);

            let categories: Vec<Option<String>> = cards
                .iter()
                .map(|card| card.get_attribute("data-category"))
                .collect();
            let visibility = visible_cards(&filter, categories.iter().map(Option::as_deref));
            for (card, visible) in cards.iter().zip(visibility) {
                let display = if visible { "block" } else { "none" };
                let _ = card.style().set_property("display", display);
                set_class(card, FADE_IN_CLASS, visible);
            }
        });
    }
    true
}

pub(super) fn install_copy_buttons(session: &UiSession) -> bool {
    let Some(document) = document() else {
        return false;
    };
    let buttons = query_all::<HtmlElement>(&document, COPY_BUTTON_SELECTOR);
    if buttons.is_empty() {
        return false;
    }
    let feedback_ms = session.config().copy_feedback_ms;

    for button in buttons {
        let session = session.clone();
        let clicked = button.clone();
        let page = document.clone();
        listen(button.as_ref(), "click", move |_event| {
            let Some(target_id) = clicked.get_attribute("data-target") else {
                return;
            };
            let Some(source) = page.get_element_by_id(&target_id) else {
                return;
            };
            let text = source.text_content().unwrap_or_default();
            let session = session.clone();
            let button = clicked.clone();
            spawn_local(async move {
                match write_clipboard_text(&text).await {
                    Ok(()) => show_copied_label(&button, feedback_ms),
                    Err(error) => {
                        tracing::warn!(%error, "copy to clipboard failed");
                        session.notify(NotificationKind::Error, COPY_FAILED_MESSAGE);
                    }
                }
            });
        });
    }
    true
}

fn show_copied_label(button: &HtmlElement, feedback_ms: u32) {
    let current = button.inner_html();
    // A second click while the label is showing keeps the first restore.
    if current == COPIED_LABEL_HTML {
        return;
    }
    button.set_inner_html(COPIED_LABEL_HTML);
    let button = button.clone();
    after_delay(feedback_ms, move || button.set_inner_html(&current));
}

async fn write_clipboard_text(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let navigator = js_sys::Reflect::get(&window, &JsValue::from_str("navigator"))
        .map_err(|_| "navigator is unavailable".to_string())?;
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .map_err(|_| "clipboard is unavailable".to_string())?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err("clipboard is unavailable".to_string());
    }
    let write_text = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .map_err(|_| "clipboard.writeText is unavailable".to_string())?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| "clipboard.writeText is not a function".to_string())?;
    let promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|_| "clipboard.writeText threw".to_string())?
        .dyn_into::<js_sys::Promise>()
        .map_err(|_| "clipboard.writeText did not return a promise".to_string())?;
    wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|error| format!("clipboard write rejected: {error:?}"))
}

pub(super) fn install_preloader(session: &UiSession) -> bool {
    let (Some(window), Some(preloader)) = (
        web_sys::window(),
        element_by_id::<HtmlElement>(PRELOADER_ID),
    ) else {
        return false;
    };
    let removal_ms = session.config().preloader_removal_ms;
    let fade_out = move || {
        set_class(&preloader, FADE_OUT_CLASS, true);
        let preloader = preloader.clone();
        after_delay(removal_ms, move || preloader.remove());
    };

    let already_loaded = document()
        .map(|document| document.ready_state() == "complete")
        .unwrap_or(false);
    if already_loaded {
        fade_out();
    } else {
        let mut pending = Some(fade_out);
        listen(window.as_ref(), "load", move |_event| {
            if let Some(fade_out) = pending.take() {
                fade_out();
            }
        });
    }
    true
}
