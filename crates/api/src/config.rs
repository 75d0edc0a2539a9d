use std::fmt;
use std::str::FromStr;

use axum::http::HeaderValue;
use url::Url;

use crate::auth::jwt::JwtConfig;

/// Deployment mode, read from `ENV`.
///
/// Development enables the sandbox conveniences: client-credential fill-in,
/// the demo bearer token, `GET /auth/demo-token` and the demo property data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl FromStr for RuntimeMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(RuntimeMode::Development),
            "production" => Ok(RuntimeMode::Production),
            _ => Err(ConfigError::UnknownMode(value.to_string())),
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Development => f.write_str("development"),
            RuntimeMode::Production => f.write_str("production"),
        }
    }
}

/// Configuration problems detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("{0} must be set in production")]
    Missing(&'static str),

    #[error("ENV must be `development` or `production`, got `{0}`")]
    UnknownMode(String),
}

/// Server configuration loaded from environment variables.
///
/// Every field has a default suitable for local development except
/// `JWT_SECRET`, which production must supply.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    pub mode: RuntimeMode,
    /// Allowed CORS origins from comma-separated `CORS_ORIGINS`. A single
    /// `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Fill-in for a missing `X-IBM-Client-Id` in development.
    pub ibm_client_id: String,
    /// Fill-in for a missing `X-IBM-Client-Secret` in development.
    pub ibm_client_secret: String,
    pub database_url: String,
}

const DEV_JWT_SECRET: &str = "default-secret-key";
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
/// Longest accepted token lifetime: one year.
const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365;

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                          |
    /// |------------------------|----------------------------------|
    /// | `HOST`                 | `0.0.0.0`                        |
    /// | `PORT`                 | `8080`                           |
    /// | `ENV`                  | `development`                    |
    /// | `CORS_ORIGINS`         | `*`                              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                             |
    /// | `JWT_SECRET`           | dev only: `default-secret-key`   |
    /// | `JWT_EXPIRY_HOURS`     | `24`                             |
    /// | `IBM_CLIENT_ID`        | `demo-client-id`                 |
    /// | `IBM_CLIENT_SECRET`    | `demo-client-secret`             |
    /// | `DATABASE_URL`         | built from `DB_*` variables      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let mode: RuntimeMode = var("ENV", "development").parse()?;

        let host = var("HOST", "0.0.0.0");
        let port = parse_var("PORT", var("PORT", "8080"))?;
        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS", "30"))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in cors_origins.iter().filter(|o| o.as_str() != "*") {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.clone(),
                });
            }
        }

        let secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if mode == RuntimeMode::Development => DEV_JWT_SECRET.to_string(),
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };
        let raw_expiry = var("JWT_EXPIRY_HOURS", &DEFAULT_JWT_EXPIRY_HOURS.to_string());
        let expiry_hours: i64 = parse_var("JWT_EXPIRY_HOURS", raw_expiry.clone())?;
        if !(1..=MAX_JWT_EXPIRY_HOURS).contains(&expiry_hours) {
            return Err(ConfigError::Invalid {
                var: "JWT_EXPIRY_HOURS",
                value: raw_expiry,
            });
        }

        let database_url = match lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            Some(url) => url,
            None => database_url_from_parts(&var)?,
        };

        Ok(Self {
            host,
            port,
            mode,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig {
                secret,
                expiry_hours,
            },
            ibm_client_id: var("IBM_CLIENT_ID", "demo-client-id"),
            ibm_client_secret: var("IBM_CLIENT_SECRET", "demo-client-secret"),
            database_url,
        })
    }

    pub fn is_development(&self) -> bool {
        self.mode == RuntimeMode::Development
    }
}

/// Assemble a Postgres URL from the `DB_*` variables, percent-encoding the
/// credentials.
fn database_url_from_parts<F>(var: &F) -> Result<String, ConfigError>
where
    F: Fn(&str, &str) -> String,
{
    let host = var("DB_HOST", "localhost");
    let port: u16 = parse_var("DB_PORT", var("DB_PORT", "5432"))?;
    let invalid_host = |_| ConfigError::Invalid {
        var: "DB_HOST",
        value: host.clone(),
    };

    let mut url = Url::parse(&format!("postgres://{host}")).map_err(invalid_host)?;
    let user = var("DB_USER", "postgres");
    url.set_username(&user).map_err(|()| ConfigError::Invalid {
        var: "DB_USER",
        value: user.clone(),
    })?;
    let password = var("DB_PASSWORD", "password");
    url.set_password(Some(&password)).map_err(|()| ConfigError::Invalid {
            var: "DB_PASSWORD",
            value: "<redacted>".to_string(),
        })?;
    url.set_port(Some(port)).map_err(|()| ConfigError::Invalid {
        var: "DB_PORT",
        value: port.to_string(),
    })?;
    url.set_path(&format!("/{}", var("DB_NAME", "api_iras")));
    url.query_pairs_mut().append_pair("sslmode", &var("DB_SSLMODE", "disable"));
    Ok(url.into())
}

fn parse_var<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}
