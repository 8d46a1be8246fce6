use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Side length of the spatial query square, in WGS84 degrees.
pub const BBOX_DELTA: f64 = 0.0005;

/// A WGS84 point. No range is enforced; coordinates outside any real
/// country are passed to the upstream services as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Both components are finite (no NaN or infinity).
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Rectangular spatial query region derived from a [`Coordinate`].
///
/// Always a fixed-size square of side [`BBOX_DELTA`] with the coordinate at
/// one corner. The axis order depends on the consuming service, so the two
/// constructors must not be mixed up: a swapped box queries a different
/// location on the map and returns wrong-place data, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Raster (WMS) axis order: `lon,lat,lon+d,lat+d`.
    #[must_use]
    pub fn raster(coord: Coordinate) -> Self {
        Self {
            min_x: coord.lon,
            min_y: coord.lat,
            max_x: coord.lon + BBOX_DELTA,
            max_y: coord.lat + BBOX_DELTA,
        }
    }

    /// Cadastral (WFS) axis order: `lat,lon,lat+d,lon+d`.
    ///
    /// The cadastre service expects latitude first, the reverse of
    /// [`BoundingBox::raster`].
    #[must_use]
    pub fn cadastral(coord: Coordinate) -> Self {
        Self {
            min_x: coord.lat,
            min_y: coord.lon,
            max_x: coord.lat + BBOX_DELTA,
            max_y: coord.lon + BBOX_DELTA,
        }
    }

    /// Comma-separated form used in WMS/WFS query strings.
    #[must_use]
    pub fn to_param(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

/// Result of one upstream lookup. Exactly one variant per call; a lookup
/// never carries both a value and an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<T> {
    Success(T),
    Unavailable,
    Failed(String),
}

/// Whether the flood-risk map has any feature covering the queried point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodRisk {
    Yes,
    No,
}

/// Aggregate answer for one analysis request.
///
/// Created fresh per request, populated by the four independent lookups,
/// handed once to rendering, and discarded. Never shared across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteReport {
    pub coordinate: Coordinate,
    /// Trimmed verbatim text from the elevation service; never parsed to a
    /// number.
    pub elevation: LookupOutcome<String>,
    /// First matching cadastral feature's properties.
    pub parcel: LookupOutcome<BTreeMap<String, String>>,
    pub soil_class: LookupOutcome<String>,
    pub flood_risk: LookupOutcome<FloodRisk>,
    pub generated_at: DateTime<Utc>,
}
