use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// AppConfig
///
/// Holds the gateway's entire configuration. Immutable once loaded; cloned into the
/// application state and read when the router and collaborators are built.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and CORS strictness.
    pub env: Env,
    // REST backend API root, e.g. http://localhost:8080/api.
    pub api_base_url: String,
    // Per-request timeout for calls to the backend.
    pub api_timeout: Duration,
    // File standing in for the browser's local storage (token + user record).
    pub session_file: PathBuf,
    // Address the gateway listens on.
    pub bind_addr: String,
    // Origin of the single-page client. Required in production; any origin locally.
    pub client_origin: Option<String>,
}

/// Env
///
/// Defines the runtime context: developer conveniences locally, strict settings in
/// production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_SESSION_FILE: &str = ".hostel-session.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5173";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for tests, so state can be assembled without
    /// touching environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            client_origin: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables, applying the **fail-fast**
    /// principle in production.
    ///
    /// # Panics
    /// Panics in production when `API_BASE_URL` or `CLIENT_ORIGIN` is missing, so the
    /// gateway never starts pointed at a developer backend or with open CORS.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // A malformed timeout falls back to the default rather than aborting start-up.
        let api_timeout = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_API_TIMEOUT_SECS));

        let session_file = env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        match env {
            Env::Local => Self {
                env: Env::Local,
                api_base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
                api_timeout,
                session_file,
                bind_addr,
                client_origin: env::var("CLIENT_ORIGIN").ok(),
            },
            Env::Production => Self {
                env: Env::Production,
                api_base_url: env::var("API_BASE_URL")
                    .expect("FATAL: API_BASE_URL required in prod"),
                api_timeout,
                session_file,
                bind_addr,
                client_origin: Some(
                    env::var("CLIENT_ORIGIN").expect("FATAL: CLIENT_ORIGIN required in prod"),
                ),
            },
        }
    }
}
