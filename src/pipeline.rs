//! Fetch, then transform.
//!
//! The fetch stage is the only fallible step. Everything after it is a pure
//! function of the fetched features.

use tracing::{debug, info};

use crate::client::{FeedSource, UsgsClient};
use crate::depth::DepthScale;
use crate::errors::QuakemapError;
use crate::map::{MapInstance, build_map};
use crate::models::Feature;
use crate::style::FeatureOverlay;

/// Fetch the features of a feed source.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the request fails, or the
/// response is not a feature collection.
pub fn fetch_features(source: &FeedSource) -> Result<Vec<Feature>, QuakemapError> {
    let client = UsgsClient::new()?;
    let feed = client.fetch(source)?;

    match &feed.metadata {
        Some(metadata) => {
            let title = metadata.title.as_deref().unwrap_or("untitled feed");
            let generated = metadata
                .generated_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".into());
            info!(
                "fetched {} events from {} (generated {})",
                feed.features.len(),
                title,
                generated
            );
        }
        None => info!("fetched {} events", feed.features.len()),
    }

    Ok(feed.features)
}

/// Style the features and compose them into a map.
#[must_use]
pub fn compose(features: &[Feature], scale: &DepthScale) -> MapInstance {
    let overlay = FeatureOverlay::from_features(features, scale);
    debug!("styled {} markers", overlay.len());
    if overlay.is_empty() {
        debug!("feed has no events; map will only show the legend");
    }
    build_map(overlay, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::color_for;
    use crate::models::FeatureCollection;

    #[test]
    fn test_two_features_end_to_end() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type":"Feature","properties":{"place":"Shallow","mag":2.0},
                 "geometry":{"type":"Point","coordinates":[-118.0,34.0,5.0]}},
                {"type":"Feature","properties":{"place":"Deep","mag":6.1},
                 "geometry":{"type":"Point","coordinates":[179.0,-20.0,95.0]}}
            ]
        }"#;
        let feed: FeatureCollection = serde_json::from_str(json).expect("parse");
        feed.validate().expect("valid collection");

        let map = compose(&feed.features, &DepthScale::USGS);

        let colors: Vec<_> = map
            .overlay
            .features
            .iter()
            .map(|f| f.marker.fill_color)
            .collect();
        assert_eq!(colors, [color_for(5.0), color_for(95.0)]);
        assert_eq!(map.legend.entries.len(), 6);
    }

    #[test]
    fn test_legend_independent_of_feature_count() {
        let empty = compose(&[], &DepthScale::USGS);
        let feed: FeatureCollection =
            serde_json::from_str(include_str!("../tools/sample_feed.json")).expect("sample");
        let full = compose(&feed.features, &DepthScale::USGS);

        assert!(empty.overlay.is_empty());
        assert_eq!(full.overlay.len(), 3);
        assert_eq!(empty.legend, full.legend);
    }
}
