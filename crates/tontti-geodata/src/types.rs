use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// GeoJSON-style feature collection returned by both the WFS `GetFeature`
/// and the JSON-format WMS `GetFeatureInfo` operations.
///
/// Only the pieces the aggregator reads are modeled; geometry and CRS
/// members are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
}

/// Flatten a feature's property set to display strings.
///
/// String values are taken verbatim; numbers, booleans, and anything else
/// keep their JSON rendering.
pub(crate) fn flatten_properties(properties: serde_json::Map<String, Value>) -> BTreeMap<String, String> {
    properties
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect()
}
