use std::env;

lazy_static::lazy_static! {
    /// Deployment environment, read once; `AppConfig::environment` is a copy of it.
    static ref ENVIRONMENT: String = environment_name();
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub frontend_url: String,
    pub api_base_path: String,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = non_empty("DATABASE_URL")
            .or_else(|| non_empty("MONGODB_URI"))
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let database_name = non_empty("DATABASE_NAME")
            .unwrap_or_else(|| database_name_from_uri(&database_url));

        let port = parse_or("PORT", 5000u16)?;
        let jwt_expiration_days = parse_or("JWT_EXPIRATION_DAYS", 7i64)?;
        if jwt_expiration_days <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRATION_DAYS",
                value: jwt_expiration_days.to_string(),
            });
        }

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            database_name,
            jwt_secret,
            jwt_expiration_days,
            frontend_url: non_empty("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            api_base_path: normalize_base_path(
                &env::var("API_BASE_PATH").unwrap_or_else(|_| "/api".to_string()),
            ),
            environment: ENVIRONMENT.clone(),
        })
    }
}

/// Whether internal error details may be echoed back to clients.
pub fn is_development() -> bool {
    ENVIRONMENT.as_str() == "development"
}

fn environment_name() -> String {
    non_empty("APP_ENV")
        .or_else(|| non_empty("NODE_ENV"))
        .unwrap_or_else(|| "production".to_string())
        .to_lowercase()
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

/// `mongodb://host:27017/mentoring?retryWrites=true` -> `mentoring`
fn database_name_from_uri(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or(""))
        .filter(|name| !name.is_empty())
        .unwrap_or("student_mentoring")
        .to_string()
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
