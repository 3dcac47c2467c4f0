use std::env;
use std::path::Path;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Header carrying the authenticated user id, injected by the auth proxy
    /// in front of this service.
    pub const IDENTITY_HEADER: &str = "IDENTITY_HEADER";
    /// Directory holding the built frontend bundle, served as static files.
    pub const FRONTEND_DIST: &str = "FRONTEND_DIST";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/inkpad.db";
    pub const IDENTITY_HEADER: &str = "x-user-id";
    pub const FRONTEND_DIST: &str = "frontend/dist";
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub identity_header: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            identity_header: env::var(env_vars::IDENTITY_HEADER)
                .unwrap_or_else(|_| defaults::IDENTITY_HEADER.to_string()),
        }
    }
}

/// Frontend bundle directory, if a built bundle is present on disk.
pub fn frontend_dist_dir() -> Option<String> {
    let dir = env::var(env_vars::FRONTEND_DIST)
        .unwrap_or_else(|_| defaults::FRONTEND_DIST.to_string());

    if Path::new(&dir).join("index.html").exists() {
        Some(dir)
    } else {
        None
    }
}
