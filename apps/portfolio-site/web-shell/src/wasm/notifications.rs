use super::*;

impl UiSession {
    /// Replaces whatever notification is on screen with a new one.
    pub(super) fn notify(&self, kind: NotificationKind, message: &str) {
        let Some(document) = document() else {
            return;
        };
        let (plan, evicted) = self.with_state(|state| {
            state.diagnostics.notifications_shown =
                state.diagnostics.notifications_shown.saturating_add(1);
            let plan = state.notifications.show(kind, message);
            let evicted = plan.evicted.and_then(|evicted_id| {
                state
                    .notification_slot
                    .take_if(|slot| slot.id == evicted_id)
            });
            (plan, evicted)
        });
        if let Some(slot) = evicted {
            slot.element.remove();
            // Eviction can run inside the evicted slot's own timer callback.
            spawn_local(async move { drop(slot) });
        }
        remove_stray_notifications(&document);

        if let Err(error) = self.mount_notification(&document, &plan) {
            record_error(self, &error);
        }
    }

    fn mount_notification(
        &self,
        document: &web_sys::Document,
        plan: &MountPlan,
    ) -> Result<(), String> {
        let (element, close) = build_notification_element(document, plan)?;
        let mount = notification_mount_point(document)
            .ok_or_else(|| "notification mount point is unavailable".to_string())?;
        mount
            .append_child(&element)
            .map_err(|_| "failed to mount notification".to_string())?;

        let id = plan.id;
        let session = self.clone();
        let close_handler = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(
            move |_event: web_sys::Event| session.dismiss_notification(id),
        ));
        close
            .add_event_listener_with_callback("click", close_handler.as_ref().unchecked_ref())
            .map_err(|_| "failed to attach notification close handler".to_string())?;

        let entering = element.clone();
        request_animation_frame_once(move || set_class(&entering, SHOW_CLASS, true));

        let session = self.clone();
        let auto_dismiss = Timeout::new(plan.auto_dismiss_ms, move || {
            session.dismiss_notification(id);
        });

        self.with_state(|state| {
            state.notification_slot = Some(NotificationSlot {
                id,
                element,
                auto_dismiss: Some(auto_dismiss),
                removal: None,
                _close_handler: close_handler,
            });
        });
        Ok(())
    }

    /// First phase of dismissal: drop the show class, cancel the pending
    /// auto-dismiss and schedule removal. Repeated calls for the same id are
    /// ignored.
    pub(super) fn dismiss_notification(&self, id: NotificationId) {
        let Some(delay) = self.with_state(|state| state.notifications.begin_dismiss(id)) else {
            return;
        };
        let element = self.with_state(|state| {
            state
                .notification_slot
                .as_ref()
                .filter(|slot| slot.id == id)
                .map(|slot| slot.element.clone())
        });
        let Some(element) = element else {
            return;
        };
        set_class(&element, SHOW_CLASS, false);

        let session = self.clone();
        let removal = Timeout::new(delay, move || session.finish_notification(id));
        let cancelled = self.with_state(|state| {
            let slot = state
                .notification_slot
                .as_mut()
                .filter(|slot| slot.id == id)?;
            slot.removal = Some(removal);
            slot.auto_dismiss.take()
        });
        if let Some(auto_dismiss) = cancelled {
            // Dropping a gloo Timeout clears it; this may be the timer whose
            // callback is running, so let the callback return first.
            spawn_local(async move { drop(auto_dismiss) });
        }
    }

    fn finish_notification(&self, id: NotificationId) {
        let removed = self.with_state(|state| {
            if !state.notifications.finish_dismiss(id) {
                return None;
            }
            match state.notification_slot.as_ref() {
                Some(slot) if slot.id == id => state.notification_slot.take(),
                _ => None,
            }
        });
        if let Some(slot) = removed {
            slot.element.remove();
            // The slot owns the timer whose callback is running right now.
            spawn_local(async move { drop(slot) });
        }
    }
}
