pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectFilter {
    All,
    Category(String),
}

impl ProjectFilter {
    /// A missing or blank `data-filter` behaves like "all".
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case(FILTER_ALL) => Self::All,
            Some(value) => Self::Category(value.to_string()),
        }
    }

    pub fn shows(&self, card_category: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => card_category.map(str::trim) == Some(category.as_str()),
        }
    }
}

/// Visibility for each card, in input order.
pub fn visible_cards<'a>(
    filter: &ProjectFilter,
    categories: impl IntoIterator<Item = Option<&'a str>>,
) -> Vec<bool> {
    categories
        .into_iter()
        .map(|category| filter.shows(category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shows_everything() {
        let filter = ProjectFilter::from_attribute(Some("all"));
        assert_eq!(filter, ProjectFilter::All);
        assert_eq!(
            visible_cards(&filter, [Some("web"), None, Some("cli")]),
            vec![true, true, true]
        );
    }

    #[test]
    fn category_matches_exactly() {
        let filter = ProjectFilter::from_attribute(Some(" web "));
        assert_eq!(
            visible_cards(&filter, [Some("web"), Some("webgl"), None, Some("web ")]),
            vec![true, false, false, true]
        );
    }

    #[test]
    fn blank_attribute_means_all() {
        assert_eq!(ProjectFilter::from_attribute(None), ProjectFilter::All);
        assert_eq!(ProjectFilter::from_attribute(Some("  ")), ProjectFilter::All);
    }
}
