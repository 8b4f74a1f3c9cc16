//! Latency quality tiers.

use serde::{Deserialize, Serialize};

/// A discrete quality bucket derived from a measured latency.
///
/// Variants are declared best to worst, so the derived ordering doubles as
/// a severity ordering: `Excellent < Good < Moderate < Poor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyTier {
    /// Below 100 ms.
    Excellent,
    /// Below 200 ms.
    Good,
    /// Below 300 ms.
    Moderate,
    /// 300 ms and above.
    Poor,
}

impl LatencyTier {
    /// Buckets a latency in milliseconds.
    pub const fn from_millis(latency_ms: u32) -> Self {
        match latency_ms {
            0..=99 => Self::Excellent,
            100..=199 => Self::Good,
            200..=299 => Self::Moderate,
            _ => Self::Poor,
        }
    }

    /// CSS class applied to the latency badge.
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Excellent => "latency-excellent",
            Self::Good => "latency-good",
            Self::Moderate => "latency-moderate",
            Self::Poor => "latency-poor",
        }
    }

    /// CSS colour variable used for the status label.
    pub const fn color_var(&self) -> &'static str {
        match self {
            Self::Excellent => "var(--delay-excellent)",
            Self::Good => "var(--delay-good)",
            Self::Moderate => "var(--delay-moderate)",
            Self::Poor => "var(--delay-poor)",
        }
    }

    /// Human-readable status.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Fair",
            Self::Poor => "Slow",
        }
    }
}

impl std::fmt::Display for LatencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
