//! Storage configuration.
//!
//! [`StorageOptions`] is what [`Storage::new`](crate::storage::Storage::new) and the
//! factory functions take. It carries the notification sink the area reports to
//! and an optional byte quota. Without a sink the area gets its own
//! [`Emitter`]; without a quota it is unlimited.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use gosub_webstorage::config::StorageOptions;
//! use gosub_webstorage::storage::Emitter;
//!
//! let opts = StorageOptions::builder()
//!     .quota(5 * 1024 * 1024)
//!     .emitter(Arc::new(Emitter::new()))
//!     .build();
//! assert_eq!(opts.quota, Some(5 * 1024 * 1024));
//! ```
//!
//! Options can also come from loosely typed host data:
//!
//! ```rust
//! use gosub_webstorage::config::StorageOptions;
//!
//! let opts = StorageOptions::from_json(&serde_json::json!({ "quota": 2048 })).unwrap();
//! assert_eq!(opts.quota, Some(2048));
//! assert!(StorageOptions::from_json(&serde_json::json!({ "emitter": {} })).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::storage::{Emitter, SinkHandle};

#[derive(Clone, Default)]
pub struct StorageOptions {
    /// Sink storage events are emitted to. Shared when cloned.
    pub emitter: Option<SinkHandle>,
    /// Maximum encoded byte usage, `None` for unlimited.
    pub quota: Option<u64>,
}

impl fmt::Debug for StorageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageOptions")
            .field("emitter", &self.emitter.as_ref().map(|_| "NotificationSink"))
            .field("quota", &self.quota)
            .finish()
    }
}

impl StorageOptions {
    pub fn builder() -> StorageOptionsBuilder {
        StorageOptionsBuilder::default()
    }

    /// Builds options from a dynamic configuration object such as `{"quota": 2048}`.
    ///
    /// `null` means defaults. A non-null `emitter` entry is rejected: a sink cannot
    /// be described by data, so it can never satisfy the sink capability here.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, StorageError> {
        let mut map = match value {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Object(map) => map.clone(),
            other => {
                return Err(StorageError::Configuration(format!(
                    "options must be an object, got {}",
                    other
                )))
            }
        };

        match map.remove("emitter") {
            None | Some(serde_json::Value::Null) => {}
            Some(_) => {
                return Err(StorageError::Configuration(
                    "the 'emitter' option must implement addListener, emit and removeAllListeners".into(),
                ))
            }
        }

        let config: StorageConfig = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| StorageError::Configuration(e.to_string()))?;
        Ok(config.into())
    }

    /// Returns the configured sink, installing a fresh [`Emitter`] first if there is none.
    pub(crate) fn resolve_emitter(&mut self) -> SinkHandle {
        self.emitter
            .get_or_insert_with(|| Arc::new(Emitter::new()) as SinkHandle)
            .clone()
    }
}

/// Serializable part of [`StorageOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub quota: Option<u64>,
}

impl From<StorageConfig> for StorageOptions {
    fn from(config: StorageConfig) -> Self {
        Self {
            emitter: None,
            quota: config.quota,
        }
    }
}

/// Builder for [`StorageOptions`].
#[derive(Clone, Default)]
pub struct StorageOptionsBuilder {
    inner: StorageOptions,
}

impl StorageOptionsBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut StorageOptions)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn emitter(self, emitter: SinkHandle) -> Self {
        self.map(|o| o.emitter = Some(emitter))
    }

    pub fn quota(self, bytes: u64) -> Self {
        self.map(|o| o.quota = Some(bytes))
    }

    pub fn unlimited(self) -> Self {
        self.map(|o| o.quota = None)
    }

    pub fn build(self) -> StorageOptions {
        self.inner
    }
}
