use super::*;

pub(super) fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

pub(super) fn element_by_id<T: JsCast>(id: &str) -> Option<T> {
    document()?
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
}

pub(super) fn query_all<T: JsCast>(root: &web_sys::Document, selector: &str) -> Vec<T> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        tracing::warn!(selector, "invalid selector");
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub(super) fn set_class(element: &web_sys::Element, class: &str, enabled: bool) {
    let _ = element.class_list().toggle_with_force(class, enabled);
}

pub(super) fn has_class(element: &web_sys::Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub(super) fn close_mobile_menu() {
    let Some(document) = document() else {
        return;
    };
    let Ok(Some(collapse)) = document.query_selector(NAVBAR_COLLAPSE_SELECTOR) else {
        return;
    };
    if has_class(&collapse, SHOW_CLASS) {
        set_class(&collapse, SHOW_CLASS, false);
    }
}

pub(super) fn media_matches(query: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.match_media(query) {
        Ok(Some(list)) => list.matches(),
        _ => false,
    }
}

pub(super) fn window_has(property: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    js_sys::Reflect::has(&window, &JsValue::from_str(property)).unwrap_or(false)
}

pub(super) fn document_cookie() -> Option<String> {
    let document = document()?;
    let html_document = document.dyn_ref::<web_sys::HtmlDocument>()?;
    html_document.cookie().ok()
}

pub(super) fn current_hostname() -> String {
    web_sys::window()
        .and_then(|window| window.location().hostname().ok())
        .unwrap_or_default()
}

pub(super) fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|window| window.scroll_y().ok())
        .unwrap_or(0.0)
}

pub(super) fn viewport_height() -> f64 {
    web_sys::window()
        .and_then(|window| window.inner_height().ok())
        .and_then(|height| height.as_f64())
        .unwrap_or(0.0)
}

pub(super) fn smooth_scroll_to(top: f64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let options = web_sys::ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

pub(super) fn navigate_to(location: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window.location().set_href(location).is_err() {
        tracing::error!(location, "navigation failed");
    }
}

/// Runs `task` after `delay_ms`; zero runs it synchronously.
pub(super) fn after_delay(delay_ms: u32, task: impl FnOnce() + 'static) {
    if delay_ms == 0 {
        task();
        return;
    }
    spawn_local(async move {
        sleep(Duration::from_millis(u64::from(delay_ms))).await;
        task();
    });
}

pub(super) fn request_animation_frame_once(callback: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        callback();
        return;
    };
    let closure = Closure::once_into_js(callback);
    if window
        .request_animation_frame(closure.unchecked_ref())
        .is_err()
    {
        tracing::debug!("requestAnimationFrame unavailable");
    }
}

/// Builds the notification node with text content only; server or user
/// supplied messages are never parsed as markup.
pub(super) fn build_notification_element(
    document: &web_sys::Document,
    plan: &MountPlan,
) -> Result<(HtmlElement, HtmlElement), String> {
    let create = |tag: &str| {
        document
            .create_element(tag)
            .map_err(|_| format!("failed to create {tag} element"))
    };

    let root = create("div")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "notification element is not HtmlElement".to_string())?;
    root.set_class_name(&plan.kind.css_class());
    let _ = root.set_attribute("role", "status");
    let _ = root.set_attribute("aria-live", "polite");

    let content = create("div")?;
    content.set_class_name("notification-content");
    let icon = create("i")?;
    icon.set_class_name(plan.kind.icon_class());
    let text = create("span")?;
    text.set_text_content(Some(&plan.message));
    content
        .append_child(&icon)
        .and_then(|_| content.append_child(&text))
        .map_err(|_| "failed to assemble notification content".to_string())?;

    let close = create("button")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "close control is not HtmlElement".to_string())?;
    close.set_class_name("notification-close");
    let _ = close.set_attribute("type", "button");
    let _ = close.set_attribute("aria-label", "Dismiss notification");
    let close_icon = create("i")?;
    close_icon.set_class_name("fas fa-times");
    close
        .append_child(&close_icon)
        .map_err(|_| "failed to assemble close control".to_string())?;

    root.append_child(&content)
        .and_then(|_| root.append_child(&close))
        .map_err(|_| "failed to assemble notification".to_string())?;

    Ok((root, close))
}

pub(super) fn notification_mount_point(document: &web_sys::Document) -> Option<web_sys::Element> {
    document
        .get_element_by_id(NOTIFICATION_ROOT_ID)
        .or_else(|| document.body().map(Into::into))
}

/// Removes notification nodes the session does not own, such as ones
/// rendered by the server template.
pub(super) fn remove_stray_notifications(document: &web_sys::Document) {
    for node in query_all::<web_sys::Element>(document, NOTIFICATION_SELECTOR) {
        node.remove();
    }
}

pub(super) fn capture_form_snapshot(form_data: &web_sys::FormData) -> FormSnapshot {
    let mut snapshot = FormSnapshot::new();
    let Ok(Some(entries)) = js_sys::try_iter(form_data) else {
        return snapshot;
    };
    for entry in entries.flatten() {
        let pair = js_sys::Array::from(&entry);
        let Some(name) = pair.get(0).as_string() else {
            continue;
        };
        let value = pair.get(1);
        if let Some(text) = value.as_string() {
            snapshot.push(name, FieldValue::Text(text));
        } else if let Ok(file) = value.dyn_into::<web_sys::File>() {
            snapshot.push(
                name,
                FieldValue::File {
                    file_name: file.name(),
                    size: file.size().max(0.0) as u64,
                },
            );
        }
    }
    snapshot
}
