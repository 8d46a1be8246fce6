use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tontti_core::Coordinate;
use tontti_geodata::GeodataClient;
use tower_http::trace::TraceLayer;

use crate::render::{render_error, render_report};

#[derive(Clone)]
pub struct AppState {
    pub geodata: Arc<GeodataClient>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    lat: f64,
    lon: f64,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/analyysi", get(analyze_site))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The single analysis endpoint.
///
/// Upstream failures never surface here as an error status: the aggregator
/// converts every lookup failure into a renderable field, so a valid query
/// always gets a 200 report. Only malformed query parameters are a client
/// error.
async fn analyze_site(
    State(state): State<AppState>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Html(render_error(&rejection.body_text())),
            )
                .into_response();
        }
    };

    let coordinate = Coordinate {
        lat: params.lat,
        lon: params.lon,
    };
    if !coordinate.is_finite() {
        return (
            StatusCode::BAD_REQUEST,
            Html(render_error("lat ja lon on oltava äärellisiä lukuja")),
        )
            .into_response();
    }

    tracing::debug!(lat = coordinate.lat, lon = coordinate.lon, "running site analysis");
    let report = tontti_geodata::analyze(&state.geodata, coordinate).await;
    Html(render_report(&report)).into_response()
}
