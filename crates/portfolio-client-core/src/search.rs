use crate::config::SearchSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Empty and hide the results panel; nothing is requested.
    Clear,
    /// Issue `url` after `delay_ms` unless another input arrives first.
    Schedule {
        generation: u64,
        query: String,
        url: String,
        delay_ms: u32,
    },
}

/// Debounce bookkeeping for the search box.
///
/// Every input bumps the generation, so a pending timer or an in-flight
/// response from an older keystroke is recognised as stale and dropped.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    settings: SearchSettings,
    generation: u64,
}

impl SearchDebouncer {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn on_input(&mut self, raw: &str) -> SearchAction {
        self.generation = self.generation.wrapping_add(1);
        match normalize_query(raw, self.settings.min_query_chars) {
            Some(query) => SearchAction::Schedule {
                generation: self.generation,
                url: search_url(&self.settings.endpoint, &query),
                query,
                delay_ms: self.settings.debounce_ms,
            },
            None => SearchAction::Clear,
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}

/// Trimmed query, or `None` below the minimum length (counted in chars).
pub fn normalize_query(raw: &str, min_chars: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < min_chars {
        return None;
    }
    Some(trimmed.to_string())
}

pub fn search_url(endpoint: &str, query: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{separator}q={}", urlencoding::encode(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_clears_results() {
        let mut debouncer = SearchDebouncer::default();
        assert_eq!(debouncer.on_input("a"), SearchAction::Clear);
        assert_eq!(debouncer.on_input("   b  "), SearchAction::Clear);
    }

    #[test]
    fn two_characters_schedule_one_trimmed_request() {
        let mut debouncer = SearchDebouncer::default();
        let action = debouncer.on_input("  rs ");
        let SearchAction::Schedule {
            generation,
            query,
            url,
            delay_ms,
        } = action
        else {
            unreachable!("two characters must schedule a request");
        };
        assert_eq!(query, "rs");
        assert_eq!(url, "/search/?q=rs");
        assert_eq!(delay_ms, 300);
        assert!(debouncer.is_current(generation));
    }

    #[test]
    fn later_input_invalidates_earlier_generation() {
        let mut debouncer = SearchDebouncer::default();
        let SearchAction::Schedule { generation: first, .. } = debouncer.on_input("ru") else {
            unreachable!("expected schedule");
        };
        let SearchAction::Schedule { generation: second, .. } = debouncer.on_input("rust") else {
            unreachable!("expected schedule");
        };
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
        assert_eq!(debouncer.generation(), second);

        // Clearing input still bumps the generation so late responses drop.
        assert_eq!(debouncer.on_input("r"), SearchAction::Clear);
        assert!(!debouncer.is_current(second));
        assert_eq!(debouncer.generation(), second + 1);
    }

    #[test]
    fn query_is_percent_encoded() {
        assert_eq!(
            search_url("/search/", "rust & wasm"),
            "/search/?q=rust%20%26%20wasm"
        );
        assert_eq!(search_url("/find?lang=en", "db"), "/find?lang=en&q=db");
    }

    #[test]
    fn minimum_length_counts_characters_not_bytes() {
        assert_eq!(normalize_query("é", 2), None);
        assert_eq!(normalize_query("éa", 2).as_deref(), Some("éa"));
    }
}
