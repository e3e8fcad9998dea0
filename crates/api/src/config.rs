//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DATABASE_URL` — Postgres connection string; in-memory store when unset
/// - `ADMIN_USERNAME` / `ADMIN_PASSWORD_SHA256` — admin credentials;
///   all admin routes are denied when either is unset
/// - `EMAIL_API_URL` / `EMAIL_API_TOKEN` — confirmation email provider
/// - `CONTACT_FORM_URL` — contact relay destination
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password_sha256: Option<String>,
    pub email_api_url: Option<String>,
    pub email_api_token: Option<String>,
    pub contact_form_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            admin_username: std::env::var("ADMIN_USERNAME").ok(),
            admin_password_sha256: std::env::var("ADMIN_PASSWORD_SHA256").ok(),
            email_api_url: std::env::var("EMAIL_API_URL").ok(),
            email_api_token: std::env::var("EMAIL_API_TOKEN").ok(),
            contact_form_url: std::env::var("CONTACT_FORM_URL").ok(),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            admin_username: None,
            admin_password_sha256: None,
            email_api_url: None,
            email_api_token: None,
            contact_form_url: None,
        }
    }
}
