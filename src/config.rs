use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_JWT_SECRET: &str = "default-secret-change-me";

/// Process configuration, read from a JSON file. Every field has a default so
/// an empty object (or no file at all) yields a runnable development setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `null` keeps everything in memory.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// `null` keeps uploads in memory.
    pub storage: Option<StorageConfig>,
    pub max_upload_bytes: usize,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database: None,
            jwt: JwtConfig::default(),
            storage: None,
            max_upload_bytes: 50 * 1024 * 1024,
            bootstrap_admin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    30
}

impl DatabaseConfig {
    fn with_url(url: String) -> Self {
        DatabaseConfig {
            url,
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            secret: DEFAULT_JWT_SECRET.to_string(),
            issuer: "http://0.0.0.0:8080".to_string(),
            audience: "http://0.0.0.0:8080/auth".to_string(),
            ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Custom endpoint for S3-compatible stores such as MinIO.
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            bucket: "music-player-bucket".to_string(),
            region: "us-east-1".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            endpoint: None,
            force_path_style: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Config {
    /// Reads the file at `path` (if any), then applies the process environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Couldn't read config file {}", path.display()))?;
                Config::from_json(&raw)
                    .with_context(|| format!("Couldn't parse config file {}", path.display()))?
            }
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Environment overrides. `AWS_BUCKET` switches object storage on; the
    /// other `AWS_*` variables only adjust an already configured store.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = lookup("DATABASE_URL") {
            match self.database.as_mut() {
                Some(database) => database.url = url,
                None => self.database = Some(DatabaseConfig::with_url(url)),
            }
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt.secret = secret;
        }
        if let Some(bucket) = lookup("AWS_BUCKET") {
            self.storage.get_or_insert_with(StorageConfig::default).bucket = bucket;
        }
        if let Some(storage) = self.storage.as_mut() {
            if let Some(region) = lookup("AWS_REGION") {
                storage.region = region;
            }
            if let Some(access_key) = lookup("AWS_ACCESS_KEY") {
                storage.access_key = access_key;
            }
            if let Some(secret_key) = lookup("AWS_SECRET_KEY") {
                storage.secret_key = secret_key;
            }
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert!(config.storage.is_none());
        assert_eq!(config.jwt.ttl_hours, 24);
        assert_eq!(config.max_upload_bytes, 52_428_800);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn nested_sections_fill_missing_fields() {
        let config = Config::from_json(
            r#"{
                "port": 9000,
                "database": { "url": "postgres://localhost/music" },
                "jwt": { "secret": "s3cret" },
                "storage": { "bucket": "tracks", "endpoint": "http://minio:9000", "force_path_style": true }
            }"#,
        )
        .unwrap();
        let database = config.database.unwrap();
        assert_eq!(database.max_connections, 10);
        assert_eq!(database.connect_timeout_secs, 30);
        assert_eq!(config.jwt.secret, "s3cret");
        assert_eq!(config.jwt.issuer, "http://0.0.0.0:8080");
        let storage = config.storage.unwrap();
        assert_eq!(storage.region, "us-east-1");
        assert!(storage.force_path_style);
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("DATABASE_URL", "postgres://db/music"),
            ("JWT_SECRET", "from-env"),
            ("AWS_BUCKET", "bucket"),
            ("AWS_REGION", "eu-west-1"),
        ]));
        assert_eq!(config.database.unwrap().url, "postgres://db/music");
        assert_eq!(config.jwt.secret, "from-env");
        let storage = config.storage.unwrap();
        assert_eq!(storage.bucket, "bucket");
        assert_eq!(storage.region, "eu-west-1");
    }

    #[test]
    fn region_alone_does_not_enable_storage() {
        let mut config = Config::default();
        config.apply_env(env(&[("AWS_REGION", "eu-west-1"), ("JWT_SECRET", " ")]));
        assert!(config.storage.is_none());
        assert!(config.uses_default_secret());
    }
}
