use regex::RegexSet;
use scanlens_types::{FilterCategory, PathFilters};
use std::sync::LazyLock;

static PROVIDERS: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new([r"Provider$", r"^Provider$", r"^Context$"]).unwrap());

static HOCS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([r"^with[A-Z]", r"(?i)^forward(Ref)?$", r"^Forward(Ref)?\("]).unwrap()
});

static CONTAINERS: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new([r"^(App)?Container$", r"^Root$", r"^ReactDev"]).unwrap());

static UTILITIES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^Fragment$",
        r"^Suspense$",
        r"^ErrorBoundary$",
        r"^Portal$",
        r"^Consumer$",
        r"^Layout$",
        r"^Router",
        r"^Hydration",
    ])
    .unwrap()
});

// Re-checks the provider suffix on purpose, so provider names stay filtered
// while `skip_boundaries` is on even if `skip_providers` is off.
static BOUNDARIES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([r"^Boundary$", r"Boundary$", r"^Provider$", r"Provider$"]).unwrap()
});

/// Whether `name` matches any rule of a single category.
pub fn category_matches(category: FilterCategory, name: &str) -> bool {
    match category {
        FilterCategory::Providers => PROVIDERS.is_match(name),
        FilterCategory::Hocs => HOCS.is_match(name),
        FilterCategory::Containers => CONTAINERS.is_match(name),
        // No rules: minified names are short enough to fall under the
        // resolver's length floor.
        FilterCategory::Minified => false,
        FilterCategory::Utilities => UTILITIES.is_match(name),
        FilterCategory::Boundaries => BOUNDARIES.is_match(name),
    }
}

/// Returns `true` when `name` may appear in a component path, i.e. no enabled
/// category matches it. Categories have no priority over each other.
pub fn classify(name: &str, filters: &PathFilters) -> bool {
    !filters
        .enabled_categories()
        .any(|category| category_matches(category, name))
}

/// [`classify`] bound to a fixed set of filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFilterEngine {
    filters: PathFilters,
}

impl PathFilterEngine {
    pub fn new(filters: PathFilters) -> Self {
        Self { filters }
    }

    pub fn filters(&self) -> &PathFilters {
        &self.filters
    }

    pub fn classify(&self, name: &str) -> bool {
        classify(name, &self.filters)
    }

    /// Categories whose rules match `name`, regardless of whether they are enabled.
    pub fn matching_categories(&self, name: &str) -> Vec<FilterCategory> {
        FilterCategory::ALL
            .into_iter()
            .filter(|category| category_matches(*category, name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excluded(name: &str) -> bool {
        !classify(name, &PathFilters::default())
    }

    #[test]
    fn test_provider_names_are_excluded_by_default() {
        assert!(!classify("FooProvider", &PathFilters::default()));
        assert!(excluded("Provider"));
        assert!(excluded("Context"));
        assert!(!excluded("ContextMenu"));
    }

    #[test]
    fn test_boundaries_overlap_keeps_providers_filtered() {
        let filters = PathFilters {
            skip_providers: false,
            ..PathFilters::default()
        };
        assert!(!classify("FooProvider", &filters));

        let neither = filters.with(FilterCategory::Boundaries, false);
        assert!(classify("FooProvider", &neither));
    }

    #[test]
    fn test_hoc_names() {
        assert!(excluded("withRouter"));
        assert!(excluded("forwardRef"));
        assert!(excluded("ForwardRef"));
        assert!(excluded("forward"));
        assert!(excluded("ForwardRef(Input)"));
        assert!(!excluded("without"));
        assert!(!excluded("Withdrawal"));
    }

    #[test]
    fn test_container_names() {
        assert!(excluded("Container"));
        assert!(excluded("AppContainer"));
        assert!(excluded("Root"));
        assert!(excluded("ReactDevOverlay"));
        assert!(!excluded("ListContainer"));
        assert!(!excluded("RootMenu"));
    }

    #[test]
    fn test_utility_names() {
        for name in [
            "Fragment",
            "Suspense",
            "ErrorBoundary",
            "Portal",
            "Consumer",
            "Layout",
            "RouterOutlet",
            "HydrationBoundary",
        ] {
            assert!(excluded(name), "{name} should be excluded");
        }
        assert!(!excluded("PageLayout"));
    }

    #[test]
    fn test_boundary_names() {
        assert!(excluded("Boundary"));
        assert!(excluded("LoadingBoundary"));
        let only_boundaries = PathFilters::none().with(FilterCategory::Boundaries, true);
        assert!(!classify("LoadingBoundary", &only_boundaries));
    }

    #[test]
    fn test_disabled_filters_keep_everything() {
        let filters = PathFilters::none();
        for name in ["FooProvider", "withTheme", "Root", "Fragment", "Boundary"] {
            assert!(classify(name, &filters), "{name} should be kept");
        }
    }

    #[test]
    fn test_engine_reports_matching_categories() {
        let engine = PathFilterEngine::default();
        assert_eq!(
            engine.matching_categories("ThemeProvider"),
            vec![FilterCategory::Providers, FilterCategory::Boundaries]
        );
        assert!(engine.matching_categories("TodoList").is_empty());
        assert!(engine.classify("TodoList"));
    }
}
