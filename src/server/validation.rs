//! Configuration validation
//!
//! Warns about settings that are legal but probably not intended.

use super::config::AppConfig;
use tracing::warn;

/// Inspect `config` and return one message per suspicious setting
pub fn validate_config(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let connector = &config.connector;

    if connector.max_attempts == 0 {
        warnings.push("connector.max_attempts is 0; every call is still tried once".to_string());
    }
    if connector.timeout_ms == 0 {
        warnings.push("connector.timeout_ms is 0; every attempt will time out".to_string());
    }
    if connector.base_delay_ms > connector.max_delay_ms {
        warnings.push(format!(
            "connector.base_delay_ms ({}) exceeds max_delay_ms ({}); delays are capped",
            connector.base_delay_ms, connector.max_delay_ms
        ));
    }
    if config.server.host == "0.0.0.0" {
        warnings.push(
            "server.host binds all interfaces (0.0.0.0); agents have no authentication".to_string(),
        );
    }

    let ports = [
        config.server.router_port,
        config.server.customer_data_port,
        config.server.support_port,
        config.server.tools_port,
    ];
    let mut unique = ports.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if unique.len() != ports.len() {
        warnings.push("two services share a listen port; `serve all` will fail".to_string());
    }

    for message in &warnings {
        warn!("CONFIG WARNING: {}", message);
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_clean() {
        assert!(validate_config(&AppConfig::default()).is_empty());
    }

    #[test]
    fn test_suspicious_settings() {
        let mut config = AppConfig::default();
        config.connector.max_attempts = 0;
        config.server.host = "0.0.0.0".to_string();
        config.server.support_port = config.server.router_port;

        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("max_attempts"));
    }
}
