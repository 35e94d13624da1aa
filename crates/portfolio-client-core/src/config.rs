use serde::{Deserialize, Serialize};

pub const DEFAULT_SUCCESS_LOCATION: &str = "/contact/success/";
pub const DEFAULT_SEARCH_ENDPOINT: &str = "/search/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("site config is not valid JSON: {0}")]
    Decode(String),
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error("success location must be a site-relative path starting with '/'")]
    InvalidSuccessLocation,
    #[error("search endpoint must not be empty")]
    EmptySearchEndpoint,
    #[error("search minimum query length must be at least 1")]
    InvalidMinimumQueryLength,
    #[error("parallax speed must be a finite number")]
    InvalidParallaxSpeed,
}

/// Timing and threshold knobs for every behavior on the page.
///
/// Deserialization fills missing fields from [`SiteConfig::default`], so a
/// page can override a single value without restating the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub contact_timeout_ms: u32,
    pub newsletter_timeout_ms: u32,
    pub pending_tick_ms: u32,
    pub success_location: String,
    pub success_redirect_delay_ms: u32,
    pub timeout_redirect_delay_ms: u32,
    pub fallback_delay_ms: u32,
    pub loopback_hosts: Vec<String>,
    pub notifications: NotificationTimings,
    pub search: SearchSettings,
    pub scroll: ScrollThresholds,
    pub counter_duration_ms: u32,
    pub counter_frame_ms: u32,
    pub default_parallax_speed: f64,
    pub skill_bar_restore_delay_ms: u32,
    pub copy_feedback_ms: u32,
    pub preloader_removal_ms: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contact_timeout_ms: 30_000,
            newsletter_timeout_ms: 10_000,
            pending_tick_ms: 500,
            success_location: DEFAULT_SUCCESS_LOCATION.to_string(),
            success_redirect_delay_ms: 1_500,
            timeout_redirect_delay_ms: 3_000,
            fallback_delay_ms: 2_000,
            loopback_hosts: vec![
                "localhost".to_string(),
                "127.0.0.1".to_string(),
                "[::1]".to_string(),
            ],
            notifications: NotificationTimings::default(),
            search: SearchSettings::default(),
            scroll: ScrollThresholds::default(),
            counter_duration_ms: 2_000,
            counter_frame_ms: 16,
            default_parallax_speed: 0.5,
            skill_bar_restore_delay_ms: 100,
            copy_feedback_ms: 2_000,
            preloader_removal_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationTimings {
    pub success_dismiss_ms: u32,
    pub default_dismiss_ms: u32,
    pub removal_delay_ms: u32,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            success_dismiss_ms: 4_000,
            default_dismiss_ms: 6_000,
            removal_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSettings {
    pub endpoint: String,
    pub debounce_ms: u32,
    pub min_query_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            debounce_ms: 300,
            min_query_chars: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollThresholds {
    pub navbar_px: f64,
    pub scroll_to_top_px: f64,
}

impl Default for ScrollThresholds {
    fn default() -> Self {
        Self {
            navbar_px: 50.0,
            scroll_to_top_px: 500.0,
        }
    }
}

impl SiteConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|error| ConfigError::Decode(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("contactTimeoutMs", self.contact_timeout_ms),
            ("newsletterTimeoutMs", self.newsletter_timeout_ms),
            ("pendingTickMs", self.pending_tick_ms),
            ("counterFrameMs", self.counter_frame_ms),
            ("search.debounceMs", self.search.debounce_ms),
            (
                "notifications.successDismissMs",
                self.notifications.success_dismiss_ms,
            ),
            (
                "notifications.defaultDismissMs",
                self.notifications.default_dismiss_ms,
            ),
        ];
        if let Some((field, _)) = durations.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroDuration { field });
        }
        if !self.success_location.starts_with('/') {
            return Err(ConfigError::InvalidSuccessLocation);
        }
        if self.search.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptySearchEndpoint);
        }
        if self.search.min_query_chars == 0 {
            return Err(ConfigError::InvalidMinimumQueryLength);
        }
        if !self.default_parallax_speed.is_finite() {
            return Err(ConfigError::InvalidParallaxSpeed);
        }
        Ok(())
    }

    /// Hostnames are compared case-insensitively and without a port.
    pub fn is_loopback_host(&self, hostname: &str) -> bool {
        let normalized = hostname.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return false;
        }
        self.loopback_hosts
            .iter()
            .any(|host| host.eq_ignore_ascii_case(&normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.contact_timeout_ms, 30_000);
        assert_eq!(config.newsletter_timeout_ms, 10_000);
        assert_eq!(config.notifications.removal_delay_ms, 300);
        assert_eq!(config.search.min_query_chars, 2);
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let config = SiteConfig::from_json_str(
            r#"{"contactTimeoutMs": 12000, "search": {"debounceMs": 150}}"#,
        )
        .expect("partial config");
        assert_eq!(config.contact_timeout_ms, 12_000);
        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(config.search.endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.newsletter_timeout_ms, 10_000);
    }

    #[test]
    fn rejects_zero_timeout() {
        let error = SiteConfig::from_json_str(r#"{"newsletterTimeoutMs": 0}"#)
            .expect_err("zero timeout must be rejected");
        assert_eq!(
            error,
            ConfigError::ZeroDuration {
                field: "newsletterTimeoutMs"
            }
        );
    }

    #[test]
    fn rejects_absolute_success_location() {
        let error =
            SiteConfig::from_json_str(r#"{"successLocation": "https://elsewhere.test/done"}"#)
                .expect_err("absolute url must be rejected");
        assert_eq!(error, ConfigError::InvalidSuccessLocation);
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let error = SiteConfig::from_json_str("{not json").expect_err("decode error");
        assert!(matches!(error, ConfigError::Decode(_)));
    }

    #[test]
    fn loopback_detection_ignores_case() {
        let config = SiteConfig::default();
        assert!(config.is_loopback_host("LocalHost"));
        assert!(config.is_loopback_host("127.0.0.1"));
        assert!(!config.is_loopback_host("example.com"));
        assert!(!config.is_loopback_host(""));
    }
}
