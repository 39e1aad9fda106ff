use crate::routes::Route;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_SESSION_DB: &str = "./videohub.db";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub session_db: String,
    pub http_timeout: Option<Duration>,
    /// First view shown, from a path like `/my-videos`.
    pub start_route: Route,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            session_db: DEFAULT_SESSION_DB.to_string(),
            http_timeout: None,
            start_route: Route::Home,
        }
    }
}

impl Config {
    /// Reads `API_URL`, `SESSION_DB`, `HTTP_TIMEOUT_SECS` and `START_PATH`. Call after
    /// `dotenv()` so a `.env` file is honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("API_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| {
                log::info!("API_URL not set, using default: {}", DEFAULT_API_URL);
                DEFAULT_API_URL.to_string()
            });

        let session_db = lookup("SESSION_DB")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_DB.to_string());

        let http_timeout = lookup("HTTP_TIMEOUT_SECS").and_then(|v| match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Invalid HTTP_TIMEOUT_SECS value {:?}: {}", v, e);
                None
            }
        });

        let start_route = lookup("START_PATH")
            .map(|path| Route::parse(&path))
            .unwrap_or_default();

        Config {
            api_url,
            session_db,
            http_timeout,
            start_route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn test_api_url_trailing_slash_is_stripped() {
        let config = config_from(&[("API_URL", "https://videos.example.com/api/")]);
        assert_eq!(config.api_url, "https://videos.example.com/api");
    }

    #[test]
    fn test_timeout_parsing() {
        assert_eq!(
            config_from(&[("HTTP_TIMEOUT_SECS", "30")]).http_timeout,
            Some(Duration::from_secs(30))
        );
        assert_eq!(config_from(&[("HTTP_TIMEOUT_SECS", "soon")]).http_timeout, None);
        assert_eq!(config_from(&[("HTTP_TIMEOUT_SECS", "0")]).http_timeout, None);
    }

    #[test]
    fn test_start_path_selects_first_view() {
        assert_eq!(
            config_from(&[("START_PATH", "/edit/65f0c1")]).start_route,
            Route::Edit("65f0c1".to_string())
        );
        assert_eq!(config_from(&[("START_PATH", "/nowhere")]).start_route, Route::Home);
    }

    #[test]
    fn test_session_db_override() {
        let config = config_from(&[("SESSION_DB", ":memory:")]);
        assert_eq!(config.session_db, ":memory:");
    }
}
