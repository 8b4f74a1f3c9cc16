//! Page state and the rendering adapter.
//!
//! [`build_page`] maps a [`PageState`] onto the template view model; it holds
//! no I/O and can be tested without a server. [`render_page`] turns that into
//! HTML. Every render replaces the whole document.

use askama::Template;
use nodeboard_types::{Dataset, UNKNOWN_PLACEHOLDER};
use serde::Deserialize;

use crate::browser::Phase;
use crate::error::WebError;
use crate::filter::{country_options, visible_nodes, CountryFilter, FilterState};
use crate::templates::{BrowserPageTemplate, FilterLink, HeaderView, NodeCard, StatsView};

/// How long the "link copied" toast stays up.
pub const COPY_TOAST_MILLIS: u64 = 3000;

const NO_TIMESTAMP: &str = "--:--:--";

/// Query parameters understood by the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Country selection; empty or absent for every country.
    #[serde(default)]
    pub country: Option<String>,
    /// Free-text search.
    #[serde(default)]
    pub q: Option<String>,
    /// `refresh` or `retry`.
    #[serde(default)]
    pub action: Option<String>,
    /// `host:port` of a node to quick-test.
    #[serde(default)]
    pub test: Option<String>,
}

/// User-triggered reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Manual refresh button.
    Refresh,
    /// Retry control on the error card.
    Retry,
}

impl PageQuery {
    /// Filter state carried by the query.
    pub fn filter(&self) -> FilterState {
        FilterState {
            country: CountryFilter::from_param(self.country.as_deref()),
            search: self.q.clone().unwrap_or_default(),
        }
    }

    /// Reload requested by the query, if any.
    pub fn action(&self) -> Option<PageAction> {
        match self.action.as_deref()? {
            "refresh" => Some(PageAction::Refresh),
            "retry" => Some(PageAction::Retry),
            _ => None,
        }
    }

    /// Informational message for a quick-test request.
    pub fn notice(&self) -> Option<String> {
        self.test
            .as_deref()
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(quick_test_message)
    }
}

/// Everything a render needs.
#[derive(Debug, Clone)]
pub struct PageState {
    pub phase: Phase,
    pub filter: FilterState,
    pub notice: Option<String>,
}

impl PageState {
    pub fn new(phase: Phase, filter: FilterState) -> Self {
        Self {
            phase,
            filter,
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

/// Explains why a quick test does not probe anything.
pub fn quick_test_message(address: &str) -> String {
    format!(
        "Quick test for {address}: browsers cannot open raw TCP connections, so a full \
         handshake test has to run server-side. The latency shown comes from the most \
         recent scheduled measurement."
    )
}

/// Link to the page with the given filter and extra parameters.
pub fn page_href(filter: &FilterState, extra: &[(&str, &str)]) -> Result<String, WebError> {
    let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(2 + extra.len());
    if let CountryFilter::Only(country) = &filter.country {
        pairs.push(("country", country.as_str()));
    }
    let search = filter.search.trim();
    if !search.is_empty() {
        pairs.push(("q", search));
    }
    pairs.extend_from_slice(extra);

    Ok(format!("?{}", serde_urlencoded::to_string(&pairs)?))
}

/// Maps page state onto the template.
pub fn build_page(state: &PageState) -> Result<BrowserPageTemplate, WebError> {
    let filter = &state.filter;

    let mut page = BrowserPageTemplate {
        header: HeaderView {
            probe_ip: "Loading...".to_string(),
            probe_location: "Location: --".to_string(),
            updated_at: NO_TIMESTAMP.to_string(),
        },
        stats: StatsView::default(),
        filters: Vec::new(),
        country_param: filter.country.as_param().to_string(),
        search: filter.search.clone(),
        refresh_href: page_href(filter, &[("action", "refresh")])?,
        is_loading: false,
        error_message: None,
        retry_href: page_href(filter, &[("action", "retry")])?,
        empty_message: None,
        cards: Vec::new(),
        notice: state.notice.clone(),
        toast_millis: COPY_TOAST_MILLIS,
    };

    match &state.phase {
        Phase::Loading => {
            page.is_loading = true;
            page.filters = filter_links(&[], filter)?;
        }
        Phase::Error(message) => {
            page.header.probe_ip = "Data failed to load".to_string();
            page.header.probe_location = "Location: unavailable".to_string();
            page.filters = filter_links(&[], filter)?;
            page.error_message = Some(message.clone());
        }
        Phase::Ready(dataset) => {
            let countries = country_options(dataset);
            page.header = header_view(dataset);
            page.stats = StatsView {
                online: dataset.len(),
                countries: countries.len(),
            };
            page.filters = filter_links(&countries, filter)?;

            let visible = visible_nodes(dataset, filter);
            if visible.is_empty() {
                page.empty_message = Some(empty_message(filter));
            }
            page.cards = visible
                .into_iter()
                .map(|node| {
                    let tier = node.tier();
                    let address = node.address();
                    Ok(NodeCard {
                        name: node.name.clone(),
                        protocol: node.protocol.clone(),
                        latency: node.latency_label(),
                        tier_class: tier.css_class(),
                        tier_color: tier.color_var(),
                        tier_label: tier.label(),
                        location: format!("{} - {}", node.country, node.city),
                        isp: node.isp_or_unknown().to_string(),
                        test_href: page_href(filter, &[("test", address.as_str())])?,
                        address,
                        link: node.link.clone(),
                    })
                })
                .collect::<Result<_, WebError>>()?;
        }
    }

    Ok(page)
}

/// Renders the page to HTML.
pub fn render_page(state: &PageState) -> Result<String, WebError> {
    Ok(build_page(state)?.render()?)
}

fn header_view(dataset: &Dataset) -> HeaderView {
    let probe = &dataset.probe;
    HeaderView {
        probe_ip: probe
            .ip
            .clone()
            .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
        probe_location: format!(
            "Location: {} - {}",
            probe.country.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER),
            probe.city.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)
        ),
        updated_at: dataset
            .updated_at
            .clone()
            .unwrap_or_else(|| NO_TIMESTAMP.to_string()),
    }
}

fn filter_links(countries: &[String], filter: &FilterState) -> Result<Vec<FilterLink>, WebError> {
    let search = filter.search.clone();
    let link = |label: &str, country: CountryFilter| -> Result<FilterLink, WebError> {
        let target = FilterState {
            country,
            search: search.clone(),
        };
        Ok(FilterLink {
            label: label.to_string(),
            value: target.country.as_param().to_string(),
            href: page_href(&target, &[])?,
            active: target.country == filter.country,
        })
    };

    let mut links = Vec::with_capacity(countries.len() + 1);
    links.push(link("All nodes", CountryFilter::All)?);
    for country in countries {
        links.push(link(country.as_str(), CountryFilter::Only(country.clone()))?);
    }
    Ok(links)
}

fn empty_message(filter: &FilterState) -> String {
    match (&filter.country, filter.search_term()) {
        (CountryFilter::All, None) => "No nodes available".to_string(),
        (CountryFilter::Only(country), None) => format!("No nodes found in {country}"),
        (CountryFilter::All, Some(_)) => {
            format!("No nodes match \"{}\"", filter.search.trim())
        }
        (CountryFilter::Only(country), Some(_)) => {
            format!("No nodes found in {country} matching \"{}\"", filter.search.trim())
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(Phase::Loading, FilterState::default())
    }
}
