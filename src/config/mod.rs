use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret for the JWT signature. Must be set via JWT_SECRET.
    pub jwt_secret: String,
    /// Secret for the signed session cookie. Falls back to the JWT secret
    /// when COOKIE_SECRET is unset, matching the original deployment.
    pub cookie_secret: String,
    pub token_expiry_hours: i64,
    pub cors_origin: String,
    /// Mark session cookies `Secure`
    pub secure_cookies: bool,
}

impl SecurityConfig {
    /// Secret backing the signed-cookie key
    pub fn effective_cookie_secret(&self) -> &str {
        if self.cookie_secret.is_empty() {
            &self.jwt_secret
        } else {
            &self.cookie_secret
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("COOKIE_SECRET") {
            self.security.cookie_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.token_expiry_hours = v.parse().unwrap_or(self.security.token_expiry_hours);
        }
        if let Ok(v) = env::var("CORS_ORIGIN") {
            self.security.cors_origin = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 5000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                cookie_secret: String::new(),
                token_expiry_hours: 24,
                cors_origin: "http://localhost:3000".to_string(),
                secure_cookies: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 5000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                cookie_secret: String::new(),
                token_expiry_hours: 24,
                cors_origin: "http://localhost:3000".to_string(),
                secure_cookies: true,
            },
        }
    }
}

// Global singleton config - initialized once at startup, read-only afterwards.
// Secrets are handed to the token and cookie services as explicit arguments.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
