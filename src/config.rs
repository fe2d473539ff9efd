use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Remote booking store. When unset the local SQLite store is used.
    pub store_url: Option<String>,
    pub store_token: String,
    pub admin_token: String,
    pub cache_ttl_secs: i64,
    pub company_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "agenda.db".to_string()),
            store_url: env::var("STORE_URL").ok().filter(|v| !v.trim().is_empty()),
            store_token: env::var("STORE_TOKEN").unwrap_or_default(),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            company_name: env::var("COMPANY_NAME").unwrap_or_else(|_| "Agenda".to_string()),
        }
    }
}
