use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

const DATAFORSEO_BASE_URL: &str = "https://api.dataforseo.com/v3";
const DATAFORSEO_SANDBOX_URL: &str = "https://sandbox.dataforseo.com/v3";

#[derive(Clone)]
pub struct AppConfig {
    pub dataforseo_login: String,
    pub dataforseo_password: String,
    pub google_maps_api_key: Option<String>,
    pub opencage_api_key: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub default_depth: u32,
    pub max_depth: u32,
    pub request_timeout_secs: u64,
    pub geocode_timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// DataForSEO base URL for the configured environment.
    ///
    /// Development uses the sandbox so local iteration never spends
    /// production API credits.
    #[must_use]
    pub fn dataforseo_base_url(&self) -> &'static str {
        match self.env {
            Environment::Development => DATAFORSEO_SANDBOX_URL,
            Environment::Test | Environment::Production => DATAFORSEO_BASE_URL,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("dataforseo_login", &self.dataforseo_login)
            .field("dataforseo_password", &"[redacted]")
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "opencage_api_key",
                &self.opencage_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("default_depth", &self.default_depth)
            .field("max_depth", &self.max_depth)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("geocode_timeout_secs", &self.geocode_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_env(env: Environment) -> AppConfig {
        AppConfig {
            dataforseo_login: "login".to_string(),
            dataforseo_password: "secret".to_string(),
            google_maps_api_key: None,
            opencage_api_key: Some("secret-key".to_string()),
            env,
            bind_addr: "0.0.0.0:8000".parse().expect("valid addr"),
            log_level: "info".to_string(),
            default_depth: 40,
            max_depth: 100,
            request_timeout_secs: 30,
            geocode_timeout_secs: 10,
            user_agent: "ranktrack/0.1 (rank-tracking)".to_string(),
        }
    }

    #[test]
    fn development_uses_sandbox_base_url() {
        let cfg = config_with_env(Environment::Development);
        assert_eq!(cfg.dataforseo_base_url(), DATAFORSEO_SANDBOX_URL);
    }

    #[test]
    fn production_uses_live_base_url() {
        let cfg = config_with_env(Environment::Production);
        assert_eq!(cfg.dataforseo_base_url(), DATAFORSEO_BASE_URL);
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let cfg = config_with_env(Environment::Development);
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("secret"), "credentials leaked: {rendered}");
        assert!(rendered.contains("[redacted]"));
    }
}
