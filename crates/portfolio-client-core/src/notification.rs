use serde::{Deserialize, Serialize};

use crate::config::NotificationTimings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Unknown names map to `Info`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" | "danger" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub fn css_class(self) -> String {
        format!("notification notification-{}", self.as_str())
    }

    #[must_use]
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Success => "fas fa-check-circle",
            Self::Error => "fas fa-exclamation-circle",
            Self::Warning => "fas fa-exclamation-triangle",
            Self::Info => "fas fa-info-circle",
        }
    }

    #[must_use]
    pub fn auto_dismiss_ms(self, timings: &NotificationTimings) -> u32 {
        match self {
            Self::Success => timings.success_dismiss_ms,
            Self::Error | Self::Warning | Self::Info => timings.default_dismiss_ms,
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::Success => "Done.",
            Self::Error => "Something went wrong. Please try again.",
            Self::Warning => "Please check and try again.",
            Self::Info => "Working on it.",
        }
    }
}

pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub phase: NotificationPhase,
}

/// What the DOM layer has to do for a `show` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPlan {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    /// Node to remove synchronously before mounting, visible or leaving.
    pub evicted: Option<NotificationId>,
    pub auto_dismiss_ms: u32,
}

/// Single-slot notification model.
///
/// Eviction is immediate so that at most one node is ever mounted; only a
/// dismissal of the current notification goes through the exit animation.
#[derive(Debug, Clone)]
pub struct NotificationSurface {
    timings: NotificationTimings,
    next_id: NotificationId,
    current: Option<ActiveNotification>,
}

impl NotificationSurface {
    pub fn new(timings: NotificationTimings) -> Self {
        Self {
            timings,
            next_id: 1,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&ActiveNotification> {
        self.current.as_ref()
    }

    pub fn show(&mut self, kind: NotificationKind, message: &str) -> MountPlan {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);

        let trimmed = message.trim();
        let message = if trimmed.is_empty() {
            kind.fallback_message().to_string()
        } else {
            trimmed.to_string()
        };

        let evicted = self.current.take().map(|previous| previous.id);
        self.current = Some(ActiveNotification {
            id,
            kind,
            message: message.clone(),
            phase: NotificationPhase::Visible,
        });

        MountPlan {
            id,
            kind,
            message,
            evicted,
            auto_dismiss_ms: kind.auto_dismiss_ms(&self.timings),
        }
    }

    /// Starts the exit animation. Returns the removal delay, or `None` when
    /// `id` is no longer current or is already leaving.
    pub fn begin_dismiss(&mut self, id: NotificationId) -> Option<u32> {
        let current = self.current.as_mut()?;
        if current.id != id || current.phase != NotificationPhase::Visible {
            return None;
        }
        current.phase = NotificationPhase::Leaving;
        Some(self.timings.removal_delay_ms)
    }

    /// Completes a dismissal. Returns `true` when the node should be removed.
    pub fn finish_dismiss(&mut self, id: NotificationId) -> bool {
        match self.current.as_ref() {
            Some(current) if current.id == id && current.phase == NotificationPhase::Leaving => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for NotificationSurface {
    fn default() -> Self {
        Self::new(NotificationTimings::default())
    }
}
