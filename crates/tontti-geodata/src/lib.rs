//! HTTP clients for the Finnish open geodata services and the report
//! aggregator.
//!
//! One [`GeodataClient`] call per upstream, each converted to a
//! [`tontti_core::LookupOutcome`] at its own boundary; [`analyze`] fans the
//! four lookups out concurrently and always assembles a full report.

mod aggregate;
mod client;
mod error;
mod types;

pub use aggregate::analyze;
pub use client::{GeodataClient, ServiceEndpoints};
pub use error::GeodataError;
