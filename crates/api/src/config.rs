use crate::auth::jwt::JwtConfig;

/// Error raised when an environment variable is missing or malformed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Credentials for the first admin account, seeded at startup when no
/// active admin exists.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Public URL of the web app, used for links in emails.
    pub app_base_url: String,
    /// Whether the WebSocket accepts a bare `?userId=` handshake when no
    /// token is supplied (default: `true`).
    pub ws_allow_user_id_handshake: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                  |
    /// |-------------------------------|--------------------------|
    /// | `HOST`                        | `0.0.0.0`                |
    /// | `PORT`                        | `3000`                   |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                     |
    /// | `APP_BASE_URL`                | `http://localhost:5173`  |
    /// | `WS_ALLOW_USER_ID_HANDSHAKE`  | `true`                   |
    /// | `BOOTSTRAP_ADMIN_EMAIL`       | unset (no seeding)       |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`    | unset (no seeding)       |
    /// | `BOOTSTRAP_ADMIN_NAME`        | `Administrator`          |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parse_var("PORT", 3000u16)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", 30u64)?;
        let app_base_url =
            std::env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:5173".into());
        let ws_allow_user_id_handshake = parse_var("WS_ALLOW_USER_ID_HANDSHAKE", true)?;

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL").ok(),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                name: std::env::var("BOOTSTRAP_ADMIN_NAME")
                    .unwrap_or_else(|_| "Administrator".into()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env()?,
            app_base_url,
            ws_allow_user_id_handshake,
            bootstrap_admin,
        })
    }
}

/// Parse an optional environment variable, falling back to `default` when unset.
pub(crate) fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
