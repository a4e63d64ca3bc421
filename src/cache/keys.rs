//! Key Codec
//!
//! Folds namespace and version into the physical key sent to the store:
//! `{namespace}:{version}:{key}`.

use std::fmt;

use crate::error::{CacheError, Result};

/// Tag used when no version was given. Explicit versions always start with
/// `i` or `s`, so the two can never collide.
const DEFAULT_VERSION_TAG: &str = "_";

// == Version ==
/// Independent value slot under the same logical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    Int(i64),
    Str(String),
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Length prefix keeps string versions unambiguous whatever they contain
            Version::Int(n) => write!(f, "i{n}"),
            Version::Str(s) => write!(f, "s{}.{s}", s.len()),
        }
    }
}

impl From<i64> for Version {
    fn from(n: i64) -> Self {
        Version::Int(n)
    }
}

impl From<i32> for Version {
    fn from(n: i32) -> Self {
        Version::Int(n.into())
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version::Str(s.to_string())
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Version::Str(s)
    }
}

// == Key Codec ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodec {
    namespace: String,
}

impl KeyCodec {
    /// Validates the namespace. It must be non-empty and free of `:` so that
    /// one namespace's prefix is never a prefix of another's.
    pub fn new(namespace: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(CacheError::InvalidConfig(
                "Namespace cannot be empty".to_string(),
            ));
        }
        if namespace.contains(':') {
            return Err(CacheError::InvalidConfig(format!(
                "Namespace '{}' must not contain ':'",
                namespace
            )));
        }
        Ok(Self { namespace })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // == Encode ==
    pub fn encode(&self, key: &str, version: Option<&Version>) -> String {
        match version {
            Some(version) => format!("{}:{}:{}", self.namespace, version, key),
            None => format!("{}:{}:{}", self.namespace, DEFAULT_VERSION_TAG, key),
        }
    }

    /// Prefix shared by every physical key of this namespace.
    pub fn prefix(&self) -> String {
        format!("{}:", self.namespace)
    }
}
