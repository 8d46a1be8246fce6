use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_ELEVATION_WMS_URL: &str =
    "https://avoin-karttakuva.maanmittauslaitos.fi/maasto/wms";
const DEFAULT_CADASTRE_WFS_URL: &str =
    "https://avoindata.maanmittauslaitos.fi/geoserver/kiinteisto/wfs";
const DEFAULT_SOIL_WMS_URL: &str =
    "https://gtkdata.gtk.fi/arcgis/services/GTKWMS/MapServer/WMSServer";
const DEFAULT_FLOOD_WMS_URL: &str =
    "https://paikkatieto.ymparisto.fi/arcgis/services/INSPIRE/Tulvakartat/MapServer/WMSServer";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var has an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var has an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup. Every
/// variable has a default; only invalid values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    Ok(AppConfig {
        bind_addr: parse_addr("TONTTI_BIND_ADDR", "0.0.0.0:3000")?,
        log_level: or_default("TONTTI_LOG_LEVEL", "info"),
        request_timeout_secs: parse_u64("TONTTI_REQUEST_TIMEOUT_SECS", "10")?,
        elevation_wms_url: or_default("TONTTI_ELEVATION_WMS_URL", DEFAULT_ELEVATION_WMS_URL),
        cadastre_wfs_url: or_default("TONTTI_CADASTRE_WFS_URL", DEFAULT_CADASTRE_WFS_URL),
        soil_wms_url: or_default("TONTTI_SOIL_WMS_URL", DEFAULT_SOIL_WMS_URL),
        flood_wms_url: or_default("TONTTI_FLOOD_WMS_URL", DEFAULT_FLOOD_WMS_URL),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert_eq!(cfg.elevation_wms_url, DEFAULT_ELEVATION_WMS_URL);
        assert_eq!(cfg.cadastre_wfs_url, DEFAULT_CADASTRE_WFS_URL);
        assert_eq!(cfg.soil_wms_url, DEFAULT_SOIL_WMS_URL);
        assert_eq!(cfg.flood_wms_url, DEFAULT_FLOOD_WMS_URL);
    }

    #[test]
    fn build_app_config_overrides_base_urls() {
        let mut map = HashMap::new();
        map.insert("TONTTI_ELEVATION_WMS_URL", "http://127.0.0.1:9999/wms");
        map.insert("TONTTI_CADASTRE_WFS_URL", "http://127.0.0.1:9999/wfs");
        let cfg = build_app_config(lookup_from_map(&map)).expect("config");
        assert_eq!(cfg.elevation_wms_url, "http://127.0.0.1:9999/wms");
        assert_eq!(cfg.cadastre_wfs_url, "http://127.0.0.1:9999/wfs");
        assert_eq!(cfg.soil_wms_url, DEFAULT_SOIL_WMS_URL);
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("TONTTI_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TONTTI_BIND_ADDR"),
            "expected InvalidEnvVar(TONTTI_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_timeout() {
        let mut map = HashMap::new();
        map.insert("TONTTI_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TONTTI_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(TONTTI_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_overrides_timeout() {
        let mut map = HashMap::new();
        map.insert("TONTTI_REQUEST_TIMEOUT_SECS", "3");
        let cfg = build_app_config(lookup_from_map(&map)).expect("config");
        assert_eq!(cfg.request_timeout_secs, 3);
    }
}
