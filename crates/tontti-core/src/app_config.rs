use std::net::SocketAddr;

/// Process-wide read-only configuration: bind address, upstream service
/// base URLs, and the shared per-call timeout.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Applied to every outbound geodata call. A hung upstream otherwise
    /// blocks the whole report indefinitely.
    pub request_timeout_secs: u64,
    pub elevation_wms_url: String,
    pub cadastre_wfs_url: String,
    pub soil_wms_url: String,
    pub flood_wms_url: String,
}
