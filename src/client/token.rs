//! Local token storage.
//!
//! The bearer token lives in a small file, read again on every request so a
//! login or logout elsewhere takes effect immediately.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::client::GatewayError;

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current token, `None` if nothing is stored.
    pub fn token(&self) -> Result<Option<String>, GatewayError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GatewayError::TokenStore(e)),
        }
    }

    /// Token for an authorized request.
    pub fn require(&self) -> Result<String, GatewayError> {
        self.token()?.ok_or(GatewayError::MissingToken)
    }

    pub fn store(&self, token: &str) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(&self.path, token)
    }

    /// Forget the token (logout). Missing file is fine.
    pub fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
