//! Application configuration
//!
//! Configuration is read from the environment (with `.env` support via
//! dotenvy). Every knob has a getter so call sites never touch `std::env`
//! directly, and `validate` is run once at startup.

use anyhow::{bail, Context};

const DEV_JWT_SECRET: &str = "nivaran-dev-secret-change-me";

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

impl StorageBackend {
    fn parse(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            other => bail!("Unknown STORAGE_BACKEND: {} (expected 's3' or 'local')", other),
        }
    }
}

/// Environment-driven application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    environment: String,
    server_port: u16,
    database_url: String,
    jwt_secret: String,
    jwt_expiry_hours: i64,
    upload_url_ttl_secs: u64,
    storage_backend: StorageBackend,
    s3_bucket: Option<String>,
    s3_region: Option<String>,
    s3_endpoint: Option<String>,
    local_storage_path: Option<String>,
    local_storage_base_url: Option<String>,
    cors_origins: Vec<String>,
    max_body_bytes: usize,
    auth_max_failures: u32,
    auth_failure_window_secs: u64,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            environment: env_opt("ENVIRONMENT")
                .or_else(|| env_opt("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            server_port: env_parse("PORT", 5000)?,
            database_url: env_opt("DATABASE_URL").context("DATABASE_URL is required")?,
            jwt_secret: env_opt("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            jwt_expiry_hours: env_parse("JWT_EXPIRY_HOURS", 24 * 7)?,
            upload_url_ttl_secs: env_parse("UPLOAD_URL_TTL_SECS", 300)?,
            storage_backend: match env_opt("STORAGE_BACKEND") {
                Some(raw) => StorageBackend::parse(&raw)?,
                None => StorageBackend::S3,
            },
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            cors_origins: env_opt("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            max_body_bytes: env_parse("MAX_BODY_BYTES", 1024 * 1024)?,
            auth_max_failures: env_parse("AUTH_MAX_FAILURES", 10)?,
            auth_failure_window_secs: env_parse("AUTH_FAILURE_WINDOW_SECS", 60)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Startup validation: fail fast on configuration that cannot work.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            bail!("JWT_SECRET must be set explicitly in production");
        }
        if self.jwt_expiry_hours <= 0 {
            bail!("JWT_EXPIRY_HOURS must be positive");
        }
        if self.upload_url_ttl_secs == 0 {
            bail!("UPLOAD_URL_TTL_SECS must be positive");
        }
        if self.storage_backend == StorageBackend::S3 && self.s3_bucket.is_none() {
            bail!("S3_BUCKET is required when STORAGE_BACKEND=s3");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.jwt_expiry_hours
    }

    pub fn upload_url_ttl_secs(&self) -> u64 {
        self.upload_url_ttl_secs
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn auth_max_failures(&self) -> u32 {
        self.auth_max_failures
    }

    pub fn auth_failure_window_secs(&self) -> u64 {
        self.auth_failure_window_secs
    }

    /// Construct a configuration directly, bypassing the environment.
    /// Intended for tests and embedded setups.
    pub fn for_tests(database_url: &str, jwt_secret: &str) -> Self {
        Config {
            environment: "test".to_string(),
            server_port: 0,
            database_url: database_url.to_string(),
            jwt_secret: jwt_secret.to_string(),
            jwt_expiry_hours: 1,
            upload_url_ttl_secs: 300,
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: None,
            local_storage_base_url: None,
            cors_origins: Vec::new(),
            max_body_bytes: 1024 * 1024,
            auth_max_failures: 10,
            auth_failure_window_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(StorageBackend::parse("s3").unwrap(), StorageBackend::S3);
        assert_eq!(StorageBackend::parse("S3").unwrap(), StorageBackend::S3);
        assert_eq!(
            StorageBackend::parse("local").unwrap(),
            StorageBackend::Local
        );
        assert!(StorageBackend::parse("nfs").is_err());
    }

    #[test]
    fn test_for_tests_defaults_are_valid() {
        let config = Config::for_tests("postgres://localhost/nivaran_test", "test-secret");
        assert!(config.validate().is_ok());
        assert!(!config.is_production());
        assert_eq!(config.upload_url_ttl_secs(), 300);
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = Config::for_tests("postgres://localhost/nivaran_test", "test-secret");
        config.upload_url_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dev_secret_in_production() {
        let mut config = Config::for_tests("postgres://localhost/nivaran_test", DEV_JWT_SECRET);
        config.environment = "production".to_string();
        // Production with the baked-in dev secret must not start; S3 bucket is
        // also missing, but the secret check fires first.
        config.storage_backend = StorageBackend::Local;
        assert!(config.validate().is_err());
    }
}
