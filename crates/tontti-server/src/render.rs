//! HTML rendering for the site report.
//!
//! Every upstream-sourced string passes through askama's HTML escaping;
//! cadastral property values in particular are attacker-adjacent text and
//! must never reach the markup verbatim.

use askama::Template;
use tontti_core::{FloodRisk, LookupOutcome, SiteReport};

const UNAVAILABLE_TEXT: &str = "Ei saatavilla";

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    lat: String,
    lon: String,
    elevation: String,
    has_parcel_rows: bool,
    parcel_rows: Vec<ParcelRow>,
    parcel_fallback: String,
    soil_class: String,
    flood_risk: String,
    generated_at: String,
}

struct ParcelRow {
    key: String,
    value: String,
}

/// Client-error page (bad query parameters).
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
}

/// Render the full analysis page for a completed report.
pub fn render_report(report: &SiteReport) -> String {
    let (parcel_rows, parcel_fallback) = match &report.parcel {
        LookupOutcome::Success(properties) => (
            properties
                .iter()
                .map(|(key, value)| ParcelRow {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
            String::new(),
        ),
        LookupOutcome::Unavailable => (Vec::new(), UNAVAILABLE_TEXT.to_string()),
        LookupOutcome::Failed(message) => (Vec::new(), format!("Virhe: {message}")),
    };

    let template = ReportTemplate {
        lat: format!("{:.5}", report.coordinate.lat),
        lon: format!("{:.5}", report.coordinate.lon),
        elevation: text_outcome(&report.elevation),
        has_parcel_rows: !parcel_rows.is_empty(),
        parcel_rows,
        parcel_fallback,
        soil_class: text_outcome(&report.soil_class),
        flood_risk: flood_text(&report.flood_risk),
        generated_at: report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    };
    template
        .render()
        .unwrap_or_else(|e| format!("Template error: {e}"))
}

pub fn render_error(message: &str) -> String {
    let template = ErrorTemplate { message };
    template
        .render()
        .unwrap_or_else(|_| message.to_string())
}

fn text_outcome(outcome: &LookupOutcome<String>) -> String {
    match outcome {
        LookupOutcome::Success(value) => value.clone(),
        LookupOutcome::Unavailable => UNAVAILABLE_TEXT.to_string(),
        LookupOutcome::Failed(message) => format!("Virhe: {message}"),
    }
}

fn flood_text(outcome: &LookupOutcome<FloodRisk>) -> String {
    match outcome {
        LookupOutcome::Success(FloodRisk::Yes) => "Kyllä".to_string(),
        LookupOutcome::Success(FloodRisk::No) => "Ei".to_string(),
        LookupOutcome::Unavailable => UNAVAILABLE_TEXT.to_string(),
        LookupOutcome::Failed(message) => format!("Virhe: {message}"),
    }
}
