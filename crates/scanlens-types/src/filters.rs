use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name-pattern categories used to drop structural components from a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    Providers,
    Hocs,
    Containers,
    Minified,
    Utilities,
    Boundaries,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 6] = [
        FilterCategory::Providers,
        FilterCategory::Hocs,
        FilterCategory::Containers,
        FilterCategory::Minified,
        FilterCategory::Utilities,
        FilterCategory::Boundaries,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterCategory::Providers => "providers",
            FilterCategory::Hocs => "hocs",
            FilterCategory::Containers => "containers",
            FilterCategory::Minified => "minified",
            FilterCategory::Utilities => "utilities",
            FilterCategory::Boundaries => "boundaries",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

fn enabled() -> bool {
    true
}

/// Immutable set of per-category skip toggles. Every category is enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFilters {
    #[serde(default = "enabled")]
    pub skip_providers: bool,
    #[serde(default = "enabled")]
    pub skip_hocs: bool,
    #[serde(default = "enabled")]
    pub skip_containers: bool,
    #[serde(default = "enabled")]
    pub skip_minified: bool,
    #[serde(default = "enabled")]
    pub skip_utilities: bool,
    #[serde(default = "enabled")]
    pub skip_boundaries: bool,
}

impl Default for PathFilters {
    fn default() -> Self {
        Self {
            skip_providers: true,
            skip_hocs: true,
            skip_containers: true,
            skip_minified: true,
            skip_utilities: true,
            skip_boundaries: true,
        }
    }
}

impl PathFilters {
    /// All categories disabled: every composite ancestor with a long enough name is kept.
    pub fn none() -> Self {
        Self {
            skip_providers: false,
            skip_hocs: false,
            skip_containers: false,
            skip_minified: false,
            skip_utilities: false,
            skip_boundaries: false,
        }
    }

    pub fn is_enabled(&self, category: FilterCategory) -> bool {
        match category {
            FilterCategory::Providers => self.skip_providers,
            FilterCategory::Hocs => self.skip_hocs,
            FilterCategory::Containers => self.skip_containers,
            FilterCategory::Minified => self.skip_minified,
            FilterCategory::Utilities => self.skip_utilities,
            FilterCategory::Boundaries => self.skip_boundaries,
        }
    }

    /// Copy with one category toggled.
    pub fn with(mut self, category: FilterCategory, skip: bool) -> Self {
        let slot = match category {
            FilterCategory::Providers => &mut self.skip_providers,
            FilterCategory::Hocs => &mut self.skip_hocs,
            FilterCategory::Containers => &mut self.skip_containers,
            FilterCategory::Minified => &mut self.skip_minified,
            FilterCategory::Utilities => &mut self.skip_utilities,
            FilterCategory::Boundaries => &mut self.skip_boundaries,
        };
        *slot = skip;
        self
    }

    pub fn enabled_categories(&self) -> impl Iterator<Item = FilterCategory> + '_ {
        FilterCategory::ALL
            .into_iter()
            .filter(|category| self.is_enabled(*category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let filters = PathFilters::default();
        assert_eq!(filters.enabled_categories().count(), 6);
    }

    #[test]
    fn test_missing_fields_deserialize_as_enabled() {
        let filters: PathFilters = serde_json::from_str(r#"{"skip_hocs": false}"#).unwrap();
        assert!(!filters.skip_hocs);
        assert!(filters.skip_providers);
        assert!(filters.skip_minified);
    }

    #[test]
    fn test_with_toggles_one_category() {
        let filters = PathFilters::default().with(FilterCategory::Utilities, false);
        assert!(!filters.is_enabled(FilterCategory::Utilities));
        assert!(filters.is_enabled(FilterCategory::Containers));
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "Boundaries".parse::<FilterCategory>().unwrap(),
            FilterCategory::Boundaries
        );
        assert!("wrappers".parse::<FilterCategory>().is_err());
    }
}
