//! Report aggregation.

use chrono::Utc;
use tontti_core::{Coordinate, LookupOutcome, SiteReport};

use crate::client::GeodataClient;

/// Run all four lookups for a coordinate and assemble the report.
///
/// The lookups have no data dependency on each other and run concurrently;
/// total latency is bounded by the slowest upstream rather than the sum of
/// four. No lookup failure short-circuits the others or the report: every
/// failure kind is already converted to a [`LookupOutcome`] variant at the
/// lookup's own boundary, so this function is infallible.
pub async fn analyze(client: &GeodataClient, coordinate: Coordinate) -> SiteReport {
    let (elevation, parcel, soil_class, flood_risk) = tokio::join!(
        client.lookup_elevation(coordinate),
        client.lookup_parcel(coordinate),
        client.lookup_soil_class(coordinate),
        client.lookup_flood_risk(coordinate),
    );

    // Soil and flood discard their error text by policy and warn at their
    // own lookup boundary; elevation and cadastre keep theirs, so log those
    // here for operators.
    if let LookupOutcome::Failed(message) = &elevation {
        tracing::warn!(source = "elevation", error = %message, "lookup failed");
    }
    if let LookupOutcome::Failed(message) = &parcel {
        tracing::warn!(source = "cadastre", error = %message, "lookup failed");
    }

    SiteReport {
        coordinate,
        elevation,
        parcel,
        soil_class,
        flood_risk,
        generated_at: Utc::now(),
    }
}
