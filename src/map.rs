//! Map composition.
//!
//! Assembles the base layers, the earthquake overlay, the legend and the layer
//! switcher into one [`MapInstance`]. The instance is a plain description; the
//! page script hands it to Leaflet, which owns layer toggling from then on.

use serde::Serialize;

use crate::depth::DepthScale;
use crate::legend::{ControlPosition, Legend, build_legend};
use crate::style::FeatureOverlay;

/// Initial center, framing the contiguous United States.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.09,
    lng: -95.71,
};

/// Initial zoom level.
pub const DEFAULT_ZOOM: u8 = 5;

/// Id of the page element the map is mounted in.
pub const MAP_CONTAINER_ID: &str = "map";

const OSM_ATTRIBUTION: &str = r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;
const OPENTOPOMAP_ATTRIBUTION: &str = r#"Map data: &copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors, <a href="http://viewfinderpanoramas.org">SRTM</a> | Map style: &copy; <a href="https://opentopomap.org">OpenTopoMap</a> (<a href="https://creativecommons.org/licenses/by-sa/3.0/">CC-BY-SA</a>)"#;

/// A geographical coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// The background tile sources the user can pick between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BaseLayerKind {
    Street,
    Topographic,
}

impl BaseLayerKind {
    pub const ALL: [Self; 2] = [Self::Street, Self::Topographic];

    /// Name shown in the layer switcher.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Street => "Street Map",
            Self::Topographic => "Topographic Map",
        }
    }

    #[must_use]
    pub fn tile_layer(self) -> TileLayer {
        let (url_template, attribution) = match self {
            Self::Street => (
                "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                OSM_ATTRIBUTION,
            ),
            Self::Topographic => (
                "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
                OPENTOPOMAP_ATTRIBUTION,
            ),
        };
        TileLayer {
            kind: self,
            name: self.display_name().to_string(),
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
        }
    }
}

/// A slippy-map tile source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub kind: BaseLayerKind,
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

/// Layer switcher: exclusive choice of base layer, free toggling of overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerControl {
    pub position: ControlPosition,
    pub collapsed: bool,
}

/// A fully composed map, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapInstance {
    pub container: String,
    pub center: LatLng,
    pub zoom: u8,
    pub base_layers: Vec<TileLayer>,
    pub active_base: BaseLayerKind,
    pub overlay: FeatureOverlay,
    pub overlay_active: bool,
    pub legend: Legend,
    pub layer_control: LayerControl,
}

impl MapInstance {
    /// The tile layer shown on load.
    #[must_use]
    pub fn active_base_layer(&self) -> Option<&TileLayer> {
        self.base_layers.iter().find(|l| l.kind == self.active_base)
    }
}

/// Compose the map around an earthquake overlay.
///
/// Center and zoom are fixed, not derived from the data. Street is the active
/// base layer, the overlay starts visible, the legend sits bottom-right and
/// the layer switcher is always expanded.
#[must_use]
pub fn build_map(overlay: FeatureOverlay, scale: &DepthScale) -> MapInstance {
    MapInstance {
        container: MAP_CONTAINER_ID.to_string(),
        center: DEFAULT_CENTER,
        zoom: DEFAULT_ZOOM,
        base_layers: BaseLayerKind::ALL.iter().map(|k| k.tile_layer()).collect(),
        active_base: BaseLayerKind::Street,
        overlay,
        overlay_active: true,
        legend: build_legend(scale),
        layer_control: LayerControl {
            position: ControlPosition::TopRight,
            collapsed: false,
        },
    }
}
