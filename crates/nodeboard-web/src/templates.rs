//! Askama template definitions.

use askama::Template;

/// Probe-origin header.
#[derive(Debug, Clone)]
pub struct HeaderView {
    pub probe_ip: String,
    pub probe_location: String,
    pub updated_at: String,
}

/// Summary counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsView {
    pub online: usize,
    pub countries: usize,
}

/// One country filter control.
#[derive(Debug, Clone)]
pub struct FilterLink {
    pub label: String,
    pub value: String,
    pub href: String,
    pub active: bool,
}

/// One node card.
#[derive(Debug, Clone)]
pub struct NodeCard {
    pub name: String,
    pub protocol: Option<String>,
    /// Badge text, `--` when unmeasured.
    pub latency: String,
    pub tier_class: &'static str,
    pub tier_color: &'static str,
    pub tier_label: &'static str,
    pub location: String,
    pub isp: String,
    pub address: String,
    pub link: String,
    pub test_href: String,
}

/// Node browser page.
#[derive(Template)]
#[template(path = "browser.html")]
pub struct BrowserPageTemplate {
    pub header: HeaderView,
    pub stats: StatsView,
    pub filters: Vec<FilterLink>,
    /// Active country as a query value, carried by the search form.
    pub country_param: String,
    pub search: String,
    pub refresh_href: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub retry_href: String,
    pub empty_message: Option<String>,
    pub cards: Vec<NodeCard>,
    pub notice: Option<String>,
    pub toast_millis: u64,
}
