//! Server configuration.
//!
//! Compile-time defaults plus the runtime [`Settings`] loaded at startup.
//! Settings come from an optional TOML file (path in `BOARDCRAFT_CONFIG`),
//! then individual environment variables override single fields.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default bind address for the HTTP server.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "./data/boardcraft.db";

/// Secret used when none is configured. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "boardcraft-dev-secret";

/// Lifetime (in minutes) of tokens minted by this server.
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Maximum number of pooled SQLite connections.
pub const DB_POOL_SIZE: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings of the API server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub jwt_secret: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            jwt_secret: DEV_JWT_SECRET.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings using `lookup` to resolve environment variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup("BOARDCRAFT_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(bind) = lookup("BOARDCRAFT_BIND") {
            settings.bind = bind;
        }
        if let Some(port) = lookup("PORT") {
            settings.port = port
                .parse()
                .map_err(|_| SettingsError::InvalidValue { key: "PORT", value: port })?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            settings.database_path = PathBuf::from(path);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            if secret.is_empty() {
                return Err(SettingsError::InvalidValue { key: "JWT_SECRET", value: secret });
            }
            settings.jwt_secret = secret;
        }

        Ok(settings)
    }

    /// Parse a TOML settings file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// True when the development secret is still in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.uses_dev_secret());
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PORT", "8081"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_PATH", "/tmp/games.db"),
        ]))
        .unwrap();
        assert_eq!(settings.port, 8081);
        assert_eq!(settings.jwt_secret, "s3cret");
        assert_eq!(settings.database_path, PathBuf::from("/tmp/games.db"));
        assert_eq!(settings.bind, DEFAULT_BIND);
    }

    #[test]
    fn rejects_bad_port() {
        let err = Settings::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn file_then_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9000\njwt_secret = \"from-file\"").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let settings = Settings::from_lookup(lookup_from(&[
            ("BOARDCRAFT_CONFIG", path.as_str()),
            ("BOARDCRAFT_BIND", "0.0.0.0"),
        ]))
        .unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.jwt_secret, "from-file");
        assert_eq!(settings.bind, "0.0.0.0");
    }
}
