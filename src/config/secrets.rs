//! Secret lookup for the device-cloud credentials
//!
//! A stored value of `-` marks a parameter that exists but was never filled
//! in, and reads as absent.

use super::{EnvSource, ProcessEnv};
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;

/// Path of a YAML file mapping parameter names to secrets
pub const SECRETS_FILE_ENV: &str = "NORDPLUG_SECRETS_FILE";

/// Placeholder value for a parameter that is not set yet
pub const UNSET_PLACEHOLDER: &str = "-";

/// Key-value store holding secrets
pub trait SecretStore: Send + Sync {
    /// Where a user should go to set a missing value
    fn describe(&self) -> String;

    /// Raw stored value, placeholder included
    fn fetch(&self, name: &str) -> Result<Option<String>>;

    /// Stored value with the placeholder and blanks mapped to `None`
    fn get_parameter(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .fetch(name)?
            .filter(|v| !v.trim().is_empty() && v.trim() != UNSET_PLACEHOLDER))
    }
}

/// Secrets injected as environment variables named after the parameter
pub struct EnvSecretStore<E: EnvSource + Send + Sync> {
    env: E,
}

impl<E: EnvSource + Send + Sync> EnvSecretStore<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: EnvSource + Send + Sync> SecretStore for EnvSecretStore<E> {
    fn describe(&self) -> String {
        "function environment".to_string()
    }

    fn fetch(&self, name: &str) -> Result<Option<String>> {
        Ok(self.env.var(name))
    }
}

/// Secrets mounted as a YAML file of `name: value` pairs
pub struct YamlSecretStore {
    source: String,
    values: HashMap<String, String>,
}

impl YamlSecretStore {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let values: HashMap<String, String> = serde_yaml::from_str(&contents)?;
        Ok(Self {
            source: format!("secrets file {}", path.as_ref().display()),
            values,
        })
    }

    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            source: "in-memory secret store".to_string(),
            values,
        }
    }
}

impl SecretStore for YamlSecretStore {
    fn describe(&self) -> String {
        self.source.clone()
    }

    fn fetch(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.get(name).cloned())
    }
}

/// File-backed store when `NORDPLUG_SECRETS_FILE` is set, process environment otherwise
pub fn select_secret_store(env: &dyn EnvSource) -> Result<Box<dyn SecretStore>> {
    match env.var(SECRETS_FILE_ENV) {
        Some(path) if !path.trim().is_empty() => {
            Ok(Box::new(YamlSecretStore::from_file(path.trim())?))
        }
        _ => Ok(Box::new(EnvSecretStore::new(ProcessEnv))),
    }
}
