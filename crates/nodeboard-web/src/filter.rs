//! Visible-subset computation.
//!
//! Everything here is pure: functions take the dataset and the filter state
//! by reference and never touch rendering.

use nodeboard_types::{Dataset, Node, UNKNOWN_COUNTRY};
use std::collections::BTreeSet;

/// Country selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CountryFilter {
    /// Every node.
    #[default]
    All,
    /// Only nodes whose country equals the value.
    Only(String),
}

impl CountryFilter {
    /// Builds a selection from a query parameter. Missing and blank mean no
    /// restriction; any other value, `all` included, is a country name.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => CountryFilter::All,
            Some(country) => CountryFilter::Only(country.to_string()),
        }
    }

    /// Query parameter form; empty for [`CountryFilter::All`].
    pub fn as_param(&self) -> &str {
        match self {
            CountryFilter::All => "",
            CountryFilter::Only(country) => country,
        }
    }

    /// Returns true if `country` passes the selection.
    pub fn matches(&self, country: &str) -> bool {
        match self {
            CountryFilter::All => true,
            CountryFilter::Only(selected) => selected == country,
        }
    }
}

/// Transient filter state: country selection plus free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub country: CountryFilter,
    pub search: String,
}

impl FilterState {
    /// Creates a filter that shows everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a country, or every country.
    pub fn select_country(&mut self, country: CountryFilter) {
        self.country = country;
    }

    /// Replaces the search term.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Lowercased search term, or `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        let term = self.search.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }

    /// Returns true if `node` is visible under this filter.
    pub fn matches(&self, node: &Node) -> bool {
        self.country.matches(&node.country) && matches_search(node, self.search_term().as_deref())
    }
}

fn matches_search(node: &Node, term: Option<&str>) -> bool {
    let Some(term) = term else {
        return true;
    };

    node.name.to_lowercase().contains(term)
        || node.country.to_lowercase().contains(term)
        || node
            .isp
            .as_deref()
            .is_some_and(|isp| isp.to_lowercase().contains(term))
}

/// Distinct countries offered as filter controls, sorted.
///
/// The unknown-country sentinel is not offered; such nodes remain visible
/// under the "All nodes" selection.
pub fn country_options(dataset: &Dataset) -> Vec<String> {
    dataset
        .nodes
        .iter()
        .map(|node| node.country.as_str())
        .filter(|country| !country.trim().is_empty() && *country != UNKNOWN_COUNTRY)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Nodes passing `filter`, in dataset order.
pub fn visible_nodes<'a>(dataset: &'a Dataset, filter: &FilterState) -> Vec<&'a Node> {
    let term = filter.search_term();
    dataset
        .nodes
        .iter()
        .filter(|node| filter.country.matches(&node.country))
        .filter(|node| matches_search(node, term.as_deref()))
        .collect()
}
