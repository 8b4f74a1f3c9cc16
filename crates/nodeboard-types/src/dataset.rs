//! Canonical node and dataset records.

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::latency::LatencyTier;
use crate::wire::WireDataset;
use crate::{UNKNOWN_PLACEHOLDER, UNMEASURED_LATENCY};

/// A measured network endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Display name.
    pub name: String,
    /// Protocol tag such as `vmess` or `ss`.
    pub protocol: Option<String>,
    /// Country reported by geo lookup, possibly [`crate::UNKNOWN_COUNTRY`].
    pub country: String,
    /// City reported by geo lookup.
    pub city: String,
    /// Network operator.
    pub isp: Option<String>,
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Raw connection string, passed through untouched.
    pub link: String,
    /// Handshake latency in milliseconds; `None` when the test failed or
    /// was not recorded.
    pub latency_ms: Option<u32>,
}

impl Node {
    /// Latency tier of this node.
    ///
    /// Unmeasured nodes rank as [`LatencyTier::Poor`].
    pub fn tier(&self) -> LatencyTier {
        self.latency_ms.map_or(LatencyTier::Poor, LatencyTier::from_millis)
    }

    /// Latency badge text: `87ms`, or `--` when unmeasured.
    pub fn latency_label(&self) -> String {
        match self.latency_ms {
            Some(ms) => format!("{ms}ms"),
            None => UNMEASURED_LATENCY.to_string(),
        }
    }

    /// `host:port` form of the endpoint.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// ISP for display, falling back to the placeholder.
    pub fn isp_or_unknown(&self) -> &str {
        self.isp.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)
    }
}

/// Where the measurements were taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOrigin {
    pub ip: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
}

/// A complete snapshot of measured nodes.
///
/// Datasets are immutable once decoded; a reload replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Timestamp of the measurement run, as written by the producer.
    pub updated_at: Option<String>,
    /// Probe origin.
    pub probe: ProbeOrigin,
    /// Nodes in producer order. Duplicates are kept.
    pub nodes: Vec<Node>,
}

impl Dataset {
    /// Decodes a `nodes.json` document in either supported layout.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DatasetError> {
        let wire: WireDataset = serde_json::from_slice(bytes)?;
        Ok(wire.into_dataset())
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl std::str::FromStr for Dataset {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(host: &str, port: u16) -> Node {
        Node {
            name: "n".into(),
            protocol: None,
            country: "US".into(),
            city: "NYC".into(),
            isp: None,
            host: host.into(),
            port,
            link: "ss://x".into(),
            latency_ms: Some(120),
        }
    }

    #[test]
    fn test_address_formats() {
        assert_eq!(node("1.2.3.4", 443).address(), "1.2.3.4:443");
        assert_eq!(node("2001:db8::1", 443).address(), "[2001:db8::1]:443");
    }

    #[test]
    fn test_isp_placeholder() {
        let mut n = node("a", 1);
        assert_eq!(n.isp_or_unknown(), "Unknown");
        n.isp = Some("Hetzner".into());
        assert_eq!(n.isp_or_unknown(), "Hetzner");
    }

    #[test]
    fn test_tier_from_node() {
        assert_eq!(node("a", 1).tier(), LatencyTier::Good);
        assert_eq!(node("a", 1).latency_label(), "120ms");

        let unmeasured = Node {
            latency_ms: None,
            ..node("a", 1)
        };
        assert_eq!(unmeasured.tier(), LatencyTier::Poor);
        assert_eq!(unmeasured.latency_label(), "--");
    }

    #[test]
    fn test_malformed_document() {
        assert!(Dataset::from_json(b"{not json").is_err());
        assert!("42".parse::<Dataset>().is_err());
    }
}
