use serde::{Deserialize, Serialize};

pub const THEME_STORAGE_KEY: &str = "theme";
pub const THEME_ATTRIBUTE: &str = "data-bs-theme";
pub const THEME_CHANGE_EVENT: &str = "themechange";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Stored,
    Platform,
}

/// Where the preference lives between page loads.
pub trait ThemeStore {
    type Error;

    fn load_theme(&self) -> Result<Option<String>, Self::Error>;
    fn persist_theme(&self, theme: Theme) -> Result<(), Self::Error>;
}

/// A stored value wins; the platform color-scheme is only consulted when
/// nothing usable was stored.
pub fn resolve_initial_theme(
    stored: Option<&str>,
    prefers_dark: impl FnOnce() -> bool,
) -> (Theme, ThemeSource) {
    if let Some(theme) = stored.and_then(Theme::parse) {
        return (theme, ThemeSource::Stored);
    }
    let theme = if prefers_dark() {
        Theme::Dark
    } else {
        Theme::Light
    };
    (theme, ThemeSource::Platform)
}

pub fn load_initial_theme<S: ThemeStore>(
    store: &S,
    prefers_dark: impl FnOnce() -> bool,
) -> (Theme, ThemeSource) {
    let stored = match store.load_theme() {
        Ok(stored) => stored,
        Err(_) => {
            tracing::warn!("theme preference could not be read; using platform preference");
            None
        }
    };
    resolve_initial_theme(stored.as_deref(), prefers_dark)
}

/// Flips the theme currently applied to the document and persists it.
/// The new theme is returned even when persisting fails.
pub fn toggle_theme<S: ThemeStore>(store: &S, current_attribute: Option<&str>) -> Theme {
    let current = current_attribute
        .and_then(Theme::parse)
        .unwrap_or(Theme::Light);
    let next = current.toggled();
    if store.persist_theme(next).is_err() {
        tracing::warn!(theme = next.as_str(), "failed to persist theme preference");
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MemoryStore {
        value: RefCell<Option<String>>,
    }

    impl ThemeStore for MemoryStore {
        type Error = ();

        fn load_theme(&self) -> Result<Option<String>, Self::Error> {
            Ok(self.value.borrow().clone())
        }

        fn persist_theme(&self, theme: Theme) -> Result<(), Self::Error> {
            *self.value.borrow_mut() = Some(theme.as_str().to_string());
            Ok(())
        }
    }

    struct BrokenStore;

    impl ThemeStore for BrokenStore {
        type Error = &'static str;

        fn load_theme(&self) -> Result<Option<String>, Self::Error> {
            Err("storage disabled")
        }

        fn persist_theme(&self, _theme: Theme) -> Result<(), Self::Error> {
            Err("storage disabled")
        }
    }

    #[test]
    fn stored_dark_survives_reload_without_platform_lookup() {
        let store = MemoryStore::default();
        let next = toggle_theme(&store, Some("light"));
        assert_eq!(next, Theme::Dark);

        let consulted = Cell::new(false);
        let (theme, source) = load_initial_theme(&store, || {
            consulted.set(true);
            false
        });
        assert_eq!(theme, Theme::Dark);
        assert_eq!(source, ThemeSource::Stored);
        assert!(!consulted.get());
    }

    #[test]
    fn falls_back_to_platform_preference() {
        let store = MemoryStore::default();
        assert_eq!(
            load_initial_theme(&store, || true),
            (Theme::Dark, ThemeSource::Platform)
        );
        assert_eq!(
            load_initial_theme(&store, || false),
            (Theme::Light, ThemeSource::Platform)
        );
    }

    #[test]
    fn unknown_stored_value_is_ignored() {
        assert_eq!(
            resolve_initial_theme(Some("sepia"), || true),
            (Theme::Dark, ThemeSource::Platform)
        );
    }

    #[test]
    fn toggle_without_attribute_goes_dark() {
        let store = MemoryStore::default();
        assert_eq!(toggle_theme(&store, None), Theme::Dark);
        assert_eq!(store.value.borrow().as_deref(), Some("dark"));
    }

    #[test]
    fn broken_storage_degrades_gracefully() {
        assert_eq!(toggle_theme(&BrokenStore, Some("dark")), Theme::Light);
        assert_eq!(
            load_initial_theme(&BrokenStore, || false),
            (Theme::Light, ThemeSource::Platform)
        );
    }
}
