//! Depth legend.
//!
//! The legend is derived once from a [`DepthScale`] as plain records; turning
//! those records into markup or terminal output is left to the renderers.

use std::fmt::Write as _;

use serde::Serialize;

use crate::depth::{Color, DepthScale};

/// Corner of the map a control is pinned to (Leaflet position names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopRight,
    BottomRight,
}

/// One legend row: a swatch and the depth range it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: Color,
    /// `None` for the open-ended shallowest row
    pub lower_km: Option<f64>,
    /// `None` for the open-ended deepest row
    pub upper_km: Option<f64>,
}

impl LegendEntry {
    /// Range label, e.g. `10 km - 30 km`, `- 10 km`, `90 km +`.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.lower_km, self.upper_km) {
            (Some(lower), Some(upper)) => format!("{lower} km - {upper} km"),
            (None, Some(upper)) => format!("- {upper} km"),
            (Some(lower), None) => format!("{lower} km +"),
            (None, None) => "all depths".to_string(),
        }
    }
}

/// The static legend control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    pub position: ControlPosition,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Render as the legend control's inner HTML.
    ///
    /// A bold heading, then one swatch and label per row. The unit is kept on
    /// the same line as its number with a non-breaking space.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!("<strong>{}</strong><br>", self.title);
        for entry in &self.entries {
            let label = entry.label().replace(" km", "&nbsp;km");
            let _ = write!(
                html,
                r#"<i style="background-color: {}">&emsp;&emsp;</i> {label} <br>"#,
                entry.color
            );
        }
        html
    }
}

/// Build the legend for a depth scale.
///
/// Rows run shallow to deep: one below the first boundary, one per adjacent
/// boundary pair, one above the last boundary. Each swatch is whatever
/// `color_for` gives at a depth inside its row, so the legend cannot drift
/// from the markers.
#[must_use]
pub fn build_legend(scale: &DepthScale) -> Legend {
    let bounds = scale.boundaries();
    let mut entries = Vec::with_capacity(scale.bucket_count());

    if let (Some(&first), Some(&last)) = (bounds.first(), bounds.last()) {
        entries.push(LegendEntry {
            color: scale.color_for(first),
            lower_km: None,
            upper_km: Some(first),
        });

        // Upper bounds are inclusive, so the upper boundary is inside the row.
        entries.extend(bounds.windows(2).map(|pair| LegendEntry {
            color: scale.color_for(pair[1]),
            lower_km: Some(pair[0]),
            upper_km: Some(pair[1]),
        }));

        entries.push(LegendEntry {
            color: scale.color_for(last + 1.0),
            lower_km: Some(last),
            upper_km: None,
        });
    }

    Legend {
        title: "Legend".to_string(),
        position: ControlPosition::BottomRight,
        entries,
    }
}
