//! Depth-to-color classification.
//!
//! Depth is split into buckets by ascending boundaries (km). A boundary value
//! belongs to the shallower bucket: the test is `depth <= boundary`.

use std::fmt;

use serde::Serialize;

/// Default bucket boundaries in kilometers.
pub const DEPTH_BOUNDARIES_KM: [f64; 5] = [10.0, 30.0, 50.0, 70.0, 90.0];

/// One color per bucket, shallowest first.
pub const DEPTH_COLORS: [Color; 6] = [
    Color("#b3ffb3"), // <= 10 km
    Color("#00cc00"), // <= 30 km
    Color("#ffff00"), // <= 50 km
    Color("#ffaa00"), // <= 70 km
    Color("#ff8000"), // <= 90 km
    Color("#ff3300"), // deeper
];

/// A CSS hex color (`#rrggbb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(&'static str);

impl Color {
    /// Split into red, green and blue components.
    ///
    /// Returns `None` if the color is not a six-digit hex code.
    #[must_use]
    pub fn rgb(self) -> Option<(u8, u8, u8)> {
        let hex = self.0.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Ordered depth boundaries and the color of each bucket they produce.
///
/// Invariant: boundaries ascend and there is exactly one more color than
/// boundaries, so every depth lands in exactly one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthScale {
    boundaries: &'static [f64],
    colors: &'static [Color],
}

impl DepthScale {
    /// The standard scale: 10/30/50/70/90 km, green through red.
    pub const USGS: Self = Self {
        boundaries: &DEPTH_BOUNDARIES_KM,
        colors: &DEPTH_COLORS,
    };

    #[must_use]
    pub fn boundaries(&self) -> &'static [f64] {
        self.boundaries
    }

    /// Number of buckets (boundaries + 1).
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.colors.len()
    }

    /// Index of the bucket a depth falls into, shallowest = 0.
    ///
    /// Depths past the last boundary (and NaN, which fails every comparison)
    /// land in the deepest bucket.
    #[must_use]
    pub fn bucket_index(&self, depth_km: f64) -> usize {
        self.boundaries
            .iter()
            .position(|&boundary| depth_km <= boundary)
            .unwrap_or(self.boundaries.len())
    }

    /// Color for a depth in kilometers. Total: every input yields a color.
    #[must_use]
    pub fn color_for(&self, depth_km: f64) -> Color {
        self.colors[self.bucket_index(depth_km)]
    }
}

/// Color for a depth on the standard scale.
#[must_use]
pub fn color_for(depth_km: f64) -> Color {
    DepthScale::USGS.color_for(depth_km)
}
