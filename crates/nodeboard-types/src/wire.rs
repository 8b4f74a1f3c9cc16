//! On-disk `nodes.json` layouts.
//!
//! Two producer layouts exist. The older one carries `updated_at`,
//! `runner_ip.query` and `link`; the newer one nests the timestamp and probe
//! address under `server_info` and names the connection string `raw`, with an
//! optional combined `address`. Both decode into the same [`Dataset`].

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::dataset::{Dataset, Node, ProbeOrigin};
use crate::{UNKNOWN_COUNTRY, UNKNOWN_PLACEHOLDER, UNNAMED_NODE};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireDataset {
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    runner_ip: Option<WireOrigin>,
    #[serde(default)]
    server_info: Option<WireOrigin>,
    #[serde(default)]
    nodes: Option<Vec<WireNode>>,
}

#[derive(Debug, Default, Deserialize)]
struct WireOrigin {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireNode {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    protocol: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    isp: Option<String>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<WirePort>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    raw: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    latency: Option<WireLatency>,
}

/// Ports arrive as numbers from one producer and as strings from another.
///
/// Anything else decodes to [`WirePort::Other`] so that one odd entry does
/// not reject the whole document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WirePort {
    Number(u64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl WirePort {
    fn to_port(&self) -> Option<u16> {
        match self {
            WirePort::Number(n) => u16::try_from(*n).ok(),
            WirePort::Float(f) if f.fract() == 0.0 && (0.0..=u16::MAX as f64).contains(f) => {
                Some(*f as u16)
            }
            WirePort::Float(_) | WirePort::Other(_) => None,
            WirePort::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Latency in milliseconds, numeric or quoted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireLatency {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl WireLatency {
    fn to_millis(&self) -> Option<u32> {
        let ms = match self {
            WireLatency::Number(n) => *n,
            WireLatency::Text(s) => s.trim().trim_end_matches("ms").trim_end().parse::<f64>().ok()?,
            WireLatency::Other(_) => return None,
        };
        (ms.is_finite() && ms >= 0.0).then(|| ms.round().min(u32::MAX as f64) as u32)
    }
}

impl WireDataset {
    pub(crate) fn into_dataset(self) -> Dataset {
        let WireDataset {
            updated_at,
            runner_ip,
            server_info,
            nodes,
        } = self;

        let timestamp = server_info.as_ref().and_then(|s| s.timestamp.clone());
        let origin = runner_ip.or(server_info).unwrap_or_default();

        Dataset {
            updated_at: non_blank(updated_at).or_else(|| non_blank(timestamp)),
            probe: ProbeOrigin {
                ip: non_blank(origin.query).or_else(|| non_blank(origin.ip)),
                country: non_blank(origin.country),
                city: non_blank(origin.city),
                location: non_blank(origin.location),
            },
            nodes: nodes
                .unwrap_or_default()
                .into_iter()
                .map(WireNode::into_node)
                .collect(),
        }
    }
}

impl WireNode {
    fn into_node(self) -> Node {
        let split = self.address.as_deref().and_then(split_address);

        let host = non_blank(self.host)
            .or_else(|| split.as_ref().map(|(h, _)| h.clone()))
            .unwrap_or_default();
        let port = self
            .port
            .as_ref()
            .and_then(WirePort::to_port)
            .or_else(|| split.as_ref().and_then(|(_, p)| *p))
            .unwrap_or(0);

        Node {
            name: non_blank(self.name).unwrap_or_else(|| UNNAMED_NODE.to_string()),
            protocol: non_blank(self.protocol),
            country: non_blank(self.country).unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            city: non_blank(self.city).unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string()),
            isp: non_blank(self.isp),
            host,
            port,
            link: self.link.or(self.raw).unwrap_or_default(),
            latency_ms: self.latency.as_ref().and_then(WireLatency::to_millis),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Splits `host:port`, `[v6]:port` or a bare host.
fn split_address(address: &str) -> Option<(String, Option<u16>)> {
    let address = address.trim();
    if address.is_empty() {
        return None;
    }

    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
        return Some((host.to_string(), port));
    }

    match address.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => {
            Some((host.to_string(), port.parse().ok()))
        }
        _ => Some((address.to_string(), None)),
    }
}
