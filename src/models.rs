//! Data models for GeoJSON earthquake feeds.
//!
//! These structures match the USGS summary feed format. Everything beyond the
//! fields the map needs is optional so that any point-feature collection
//! deserializes.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::QuakemapError;

/// Top-level GeoJSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Feed metadata (USGS feeds only)
    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Earthquake events
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Validate the response structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a feature collection.
    pub fn validate(&self) -> Result<(), QuakemapError> {
        if self.type_ != "FeatureCollection" {
            return Err(QuakemapError::InvalidResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        Ok(())
    }
}

/// Metadata about the feed response.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// When this feed was generated (ms since epoch)
    pub generated: Option<i64>,

    /// Human-readable title
    pub title: Option<String>,
}

impl Metadata {
    /// Get the generation time as a `DateTime<Utc>`.
    #[must_use]
    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Read `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single earthquake event.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Geographic location; GeoJSON allows `null` for unlocated features
    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// Event properties
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
}

impl Feature {
    /// Whether the feature has a geometry to place on the map.
    #[must_use]
    pub fn is_located(&self) -> bool {
        self.geometry.is_some()
    }

    /// Coordinate at `index`, or 0.0 when absent or `null`.
    fn coordinate(&self, index: usize) -> f64 {
        self.geometry
            .as_ref()
            .and_then(|g| g.coordinates.get(index).copied().flatten())
            .unwrap_or(0.0)
    }

    /// Get the event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.properties
            .time
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Get longitude (degrees).
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinate(0)
    }

    /// Get latitude (degrees).
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinate(1)
    }

    /// Get depth in kilometers (positive down).
    #[must_use]
    pub fn depth_km(&self) -> f64 {
        self.coordinate(2)
    }
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Coordinates: [longitude, latitude, depth_km]; any entry may be `null`
    #[serde(default, deserialize_with = "null_as_default")]
    pub coordinates: Vec<Option<f64>>,
}

/// The event properties the map reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Properties {
    /// Magnitude value
    pub mag: Option<f64>,

    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch)
    pub time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_feed() {
        let json = include_str!("../tools/sample_feed.json");
        let feed: FeatureCollection =
            serde_json::from_str(json).expect("failed to parse sample feed");

        feed.validate().expect("invalid feed");
        assert_eq!(feed.features.len(), 3);

        let metadata = feed.metadata.as_ref().expect("usgs metadata");
        assert_eq!(metadata.title.as_deref(), Some("USGS All Earthquakes, Past Week"));
        assert!(metadata.generated_at().is_some());

        let first = &feed.features[0];
        assert_eq!(first.properties.place.as_deref(), Some("10km NE of Testville"));
        assert_eq!(first.properties.mag, Some(4.2));
        assert!((first.longitude() - (-120.1)).abs() < f64::EPSILON);
        assert!((first.latitude() - 38.5).abs() < f64::EPSILON);
        assert!((first.depth_km() - 12.3).abs() < f64::EPSILON);
        assert!(first.time().is_some());
    }

    #[test]
    fn test_missing_fields_are_lenient() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[1.0]},"properties":{}}
        ]}"#;
        let feed: FeatureCollection = serde_json::from_str(json).expect("parse");
        let feature = &feed.features[0];
        assert!(feature.properties.mag.is_none());
        assert!(feature.properties.place.is_none());
        assert!(feature.time().is_none());
        assert!(feature.depth_km().abs() < f64::EPSILON);
    }

    #[test]
    fn test_null_geometry_does_not_fail_collection() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"place":"Located","mag":3.1},
             "geometry":{"type":"Point","coordinates":[-120.0,38.0,7.5]}},
            {"type":"Feature","properties":{"place":"Unlocated","mag":2.0},"geometry":null}
        ]}"#;
        let feed: FeatureCollection = serde_json::from_str(json).expect("parse");
        assert_eq!(feed.features.len(), 2);
        assert!(feed.features[0].is_located());
        assert!(!feed.features[1].is_located());
        assert!(feed.features[1].depth_km().abs() < f64::EPSILON);
    }

    #[test]
    fn test_null_coordinates_fall_back() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":null,
             "geometry":{"type":"Point","coordinates":[-120.1,38.5,null]}},
            {"type":"Feature","properties":{},
             "geometry":{"type":"Point","coordinates":null}}
        ]}"#;
        let feed: FeatureCollection = serde_json::from_str(json).expect("parse");

        let partial = &feed.features[0];
        assert!((partial.longitude() - (-120.1)).abs() < f64::EPSILON);
        assert!((partial.latitude() - 38.5).abs() < f64::EPSILON);
        assert!(partial.depth_km().abs() < f64::EPSILON);
        assert!(partial.properties.mag.is_none());

        let empty = &feed.features[1];
        assert!(empty.is_located());
        assert!(empty.longitude().abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_non_collection() {
        let json = r#"{"type":"Feature","features":[]}"#;
        let feed: FeatureCollection = serde_json::from_str(json).expect("parse");
        assert!(feed.validate().is_err());
    }
}
