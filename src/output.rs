//! Renderers for the composed map and the legend.
//!
//! Supports a standalone Leaflet HTML page, JSON, and a human-readable
//! terminal view with true-color swatches.

use std::io::{self, Write};

use serde::Serialize;

use crate::depth::Color;
use crate::legend::Legend;
use crate::map::MapInstance;

// ANSI codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const LEAFLET_VERSION: &str = "1.9.4";

/// Placeholder in [`PAGE_TEMPLATE`] replaced by the page data.
const DATA_PLACEHOLDER: &str = "__QUAKEMAP_DATA__";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Standalone Leaflet page
    #[default]
    Html,
    /// Pretty-printed JSON
    Json,
    /// Terminal output with color swatches
    Human,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "human" => Ok(Self::Human),
            _ => Err(format!("unknown format: {s} (expected: html, json, human)")),
        }
    }
}

/// What the page script receives.
#[derive(Serialize)]
struct PageData<'a> {
    map: &'a MapInstance,
    legend_html: String,
}

/// A two-cell block painted in the given color, or blanks if it is not hex.
fn ansi_swatch(color: Color) -> String {
    match color.rgb() {
        Some((r, g, b)) => format!("\x1b[48;2;{r};{g};{b}m  {RESET}"),
        None => "  ".to_string(),
    }
}

/// Serialize to JSON that is safe inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> io::Result<String> {
    let json =
        serde_json::to_string(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(json.replace("</", "<\\/"))
}

/// Render the map as a complete HTML document.
///
/// # Errors
///
/// Returns an error if the map cannot be serialized.
pub fn render_page(map: &MapInstance) -> io::Result<String> {
    let data = PageData {
        map,
        legend_html: map.legend.to_html(),
    };
    let json = script_json(&data)?;
    Ok(PAGE_TEMPLATE
        .replace("__LEAFLET_VERSION__", LEAFLET_VERSION)
        .replace(DATA_PLACEHOLDER, &json))
}

/// Write the map as an HTML page.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_html<W: Write>(writer: &mut W, map: &MapInstance) -> io::Result<()> {
    writer.write_all(render_page(map)?.as_bytes())
}

/// Write any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write one line per marker: swatch, place, magnitude and depth.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human_markers<W: Write>(writer: &mut W, map: &MapInstance) -> io::Result<()> {
    for styled in &map.overlay.features {
        let swatch = ansi_swatch(styled.marker.fill_color);
        let details = styled.popup.lines.join(" │ ");
        writeln!(
            writer,
            "{swatch} {BOLD}{}{RESET} {DIM}│ {details}{RESET}",
            styled.popup.title
        )?;
    }
    writeln!(
        writer,
        "{DIM}{} events on the {} overlay{RESET}",
        map.overlay.len(),
        map.overlay.name
    )
}

/// Write the legend as a swatch table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human_legend<W: Write>(writer: &mut W, legend: &Legend) -> io::Result<()> {
    writeln!(writer, "{BOLD}{}{RESET}", legend.title)?;
    for entry in &legend.entries {
        writeln!(
            writer,
            "{} {} {DIM}{}{RESET}",
            ansi_swatch(entry.color),
            entry.label(),
            entry.color
        )?;
    }
    Ok(())
}

/// Write the map in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_map<W: Write>(writer: &mut W, map: &MapInstance, format: Format) -> io::Result<()> {
    match format {
        Format::Html => write_html(writer, map),
        Format::Json => write_json(writer, map),
        Format::Human => write_human_markers(writer, map),
    }
}

/// Write the legend in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_legend<W: Write>(writer: &mut W, legend: &Legend, format: Format) -> io::Result<()> {
    match format {
        Format::Html => writeln!(writer, "{}", legend.to_html()),
        Format::Json => write_json(writer, legend),
        Format::Human => write_human_legend(writer, legend),
    }
}

// ============================================================================
// HTML Template (embedded for single-file output)
// ============================================================================

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Earthquake Map</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@__LEAFLET_VERSION__/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@__LEAFLET_VERSION__/dist/leaflet.js"></script>
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { height: 100%; width: 100%; }
    .legend {
      padding: 6px 10px;
      font: 14px/18px Arial, Helvetica, sans-serif;
      background: rgba(255, 255, 255, 0.9);
      box-shadow: 0 0 15px rgba(0, 0, 0, 0.2);
      border-radius: 5px;
      line-height: 24px;
      color: #555;
    }
    .legend i {
      display: inline-block;
      width: 18px;
      height: 18px;
      margin-right: 8px;
      opacity: 0.8;
      vertical-align: middle;
    }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    (function () {
      var data = __QUAKEMAP_DATA__;
      var cfg = data.map;

      var tiles = {};
      var baseMaps = {};
      cfg.base_layers.forEach(function (layer) {
        tiles[layer.kind] = L.tileLayer(layer.url_template, { attribution: layer.attribution });
        baseMaps[layer.name] = tiles[layer.kind];
      });

      var markers = cfg.overlay.features.map(function (f) {
        var m = f.marker;
        return L.circleMarker([m.lat, m.lng], {
          radius: m.radius,
          fillColor: m.fill_color,
          weight: m.weight,
          opacity: m.opacity,
          fillOpacity: m.fill_opacity
        }).bindPopup(f.popup_html);
      });
      var earthquakes = L.layerGroup(markers);

      var overlayMaps = {};
      overlayMaps[cfg.overlay.name] = earthquakes;

      var layers = [tiles[cfg.active_base]];
      if (cfg.overlay_active) {
        layers.push(earthquakes);
      }

      var map = L.map(cfg.container, {
        center: [cfg.center.lat, cfg.center.lng],
        zoom: cfg.zoom,
        layers: layers
      });

      var legend = L.control({ position: cfg.legend.position });
      legend.onAdd = function () {
        var div = L.DomUtil.create("div", "legend");
        div.innerHTML = data.legend_html;
        return div;
      };
      legend.addTo(map);

      L.control.layers(baseMaps, overlayMaps, {
        collapsed: cfg.layer_control.collapsed,
        position: cfg.layer_control.position
      }).addTo(map);
    })();
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthScale;
    use crate::map::build_map;
    use crate::models::FeatureCollection;
    use crate::style::FeatureOverlay;

    fn sample_map() -> MapInstance {
        let feed: FeatureCollection =
            serde_json::from_str(include_str!("../tools/sample_feed.json")).expect("sample");
        let overlay = FeatureOverlay::from_features(&feed.features, &DepthScale::USGS);
        build_map(overlay, &DepthScale::USGS)
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("html".parse::<Format>().unwrap(), Format::Html);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("HUMAN".parse::<Format>().unwrap(), Format::Human);
        assert!("ndjson".parse::<Format>().is_err());
    }

    #[test]
    fn test_page_embeds_map() {
        let page = render_page(&sample_map()).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(r#"<div id="map"></div>"#));
        assert!(page.contains("leaflet@1.9.4/dist/leaflet.js"));
        assert!(page.contains("10km NE of Testville"));
        assert!(page.contains("#ff3300"));
        assert!(!page.contains(DATA_PLACEHOLDER));
        assert!(!page.contains("__LEAFLET_VERSION__"));
    }

    #[test]
    fn test_page_escapes_closing_tags_in_data() {
        let page = render_page(&sample_map()).unwrap();
        let script_start = page.find("var data = ").unwrap();
        let script = &page[script_start..];
        let end = script.find("</script>").unwrap();
        // The popup and legend markup inside the data must not close the script.
        assert!(script[..end].contains(r"<\/h3>"));
        assert!(script[..end].contains(r"<\/strong>"));
    }

    #[test]
    fn test_json_output_round_trips_through_serde() {
        let mut buf = Vec::new();
        write_map(&mut buf, &sample_map(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["zoom"], 5);
        assert_eq!(value["overlay"]["features"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_human_legend_lists_every_row() {
        let map = sample_map();
        let mut buf = Vec::new();
        write_legend(&mut buf, &map.legend, Format::Human).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("\x1b[48;2;179;255;179m"));
        assert!(text.contains("90 km +"));
    }

    #[test]
    fn test_human_markers_summary() {
        let mut buf = Vec::new();
        write_map(&mut buf, &sample_map(), Format::Human).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Fiji region"));
        assert!(text.contains("3 events on the Earthquakes overlay"));
    }
}
