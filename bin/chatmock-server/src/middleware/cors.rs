use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

/// `None` when CORS is switched off entirely.
pub fn cors_layer(config: &Config) -> Option<CorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    // An empty or unparsable list means "any origin", same as no list at all.
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };
    Some(cors.allow_headers(Any).allow_methods(Any))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn disabled_means_no_layer() {
        let config = Config {
            cors_enabled: false,
            ..Config::default()
        };
        assert!(cors_layer(&config).is_none());
        assert!(cors_layer(&Config::default()).is_some());
    }
}
