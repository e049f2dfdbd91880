//! Turning earthquake features into map markers and popups.

use std::fmt::Write as _;

use serde::Serialize;

use crate::depth::{Color, DepthScale};
use crate::models::Feature;

/// Marker radius per unit of magnitude.
pub const MAGNITUDE_SCALE: f64 = 5.0;

const STROKE_WEIGHT: f64 = 1.0;
const STROKE_OPACITY: f64 = 1.0;
const FILL_OPACITY: f64 = 0.8;

/// Name of the overlay that holds the earthquake markers.
pub const OVERLAY_NAME: &str = "Earthquakes";

/// A circle marker as the map draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    /// Not clamped: zero or negative magnitudes give a non-positive radius.
    pub radius: f64,
    pub fill_color: Color,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

/// Popup content bound to a marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
}

impl Popup {
    /// Render as HTML: the title as a heading, one paragraph per line.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!("<h3>{}</h3>", escape_html(&self.title));
        for line in &self.lines {
            let _ = write!(html, "<p>{}</p>", escape_html(line));
        }
        html
    }
}

/// A feature after styling: what gets drawn and what the popup says.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledFeature {
    pub marker: Marker,
    pub popup: Popup,
    /// Popup pre-rendered to HTML for the page script.
    pub popup_html: String,
}

/// Derive the marker and popup for one feature.
///
/// Values are passed through as the feed reports them: no rounding, no unit
/// conversion and no validation.
#[must_use]
pub fn style_feature(feature: &Feature, scale: &DepthScale) -> StyledFeature {
    let depth = feature.depth_km();
    let magnitude = feature.properties.mag;

    let marker = Marker {
        lat: feature.latitude(),
        lng: feature.longitude(),
        radius: magnitude.unwrap_or(0.0) * MAGNITUDE_SCALE,
        fill_color: scale.color_for(depth),
        weight: STROKE_WEIGHT,
        opacity: STROKE_OPACITY,
        fill_opacity: FILL_OPACITY,
    };

    let title = feature
        .properties
        .place
        .clone()
        .unwrap_or_else(|| "Unknown location".into());

    let mut lines = vec![
        match magnitude {
            Some(m) => format!("Magnitude: {m}"),
            None => "Magnitude: unknown".to_string(),
        },
        format!("Depth: {depth}"),
    ];
    if let Some(time) = feature.time() {
        lines.push(format!("Time: {} UTC", time.format("%Y-%m-%d %H:%M:%S")));
    }

    let popup = Popup { title, lines };
    let popup_html = popup.to_html();

    StyledFeature {
        marker,
        popup,
        popup_html,
    }
}

/// The earthquake overlay: every feature, styled, in feed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureOverlay {
    pub name: String,
    pub features: Vec<StyledFeature>,
}

impl FeatureOverlay {
    /// Style a whole collection on the given scale.
    ///
    /// Features without a geometry cannot be placed and are left out; the
    /// rest of the collection still renders.
    #[must_use]
    pub fn from_features(features: &[Feature], scale: &DepthScale) -> Self {
        Self {
            name: OVERLAY_NAME.to_string(),
            features: features
                .iter()
                .filter(|f| f.is_located())
                .map(|f| style_feature(f, scale))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Escape text for inclusion in HTML element content or attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
