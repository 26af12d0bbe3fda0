use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use super::emitter::{NotificationSink, SinkHandle};
use super::event::{StorageEvent, STORAGE_EVENT};
use super::quota::{encoded_size, QuotaAccountant};
use super::store::{self, BackingStore};
use super::types::{Locator, StorageKind};
use super::value::StorageValue;
use crate::config::StorageOptions;
use crate::errors::StorageError;

struct AreaState {
    store: Box<dyn BackingStore>,
    quota: QuotaAccountant,
}

/// One storage area with the DOM `Storage` interface.
///
/// Every mutating call snapshots the area, checks the quota, writes and updates
/// usage under one lock. Reads happen before the write, so an error always
/// means nothing changed. The call then emits a [`StorageEvent`] on the
/// `storage` channel of its sink before returning. Listeners run outside the
/// lock and may call back into the area.
pub struct Storage {
    kind: StorageKind,
    persistent: bool,
    state: Mutex<AreaState>,
    sink: SinkHandle,
}

impl Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("kind", &self.kind)
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}

impl Storage {
    /// Opens a local storage area at `locator`. Ephemeral locators (`""`,
    /// `":memory:"`, [`Locator::Empty`]) give an in-memory area.
    pub fn new(locator: impl Into<Locator>, options: StorageOptions) -> Result<Self, StorageError> {
        Self::open(StorageKind::Local, &locator.into(), options)
    }

    pub(crate) fn open(
        kind: StorageKind,
        locator: &Locator,
        mut options: StorageOptions,
    ) -> Result<Self, StorageError> {
        let sink = options.resolve_emitter();
        let store = store::open(locator)?;

        let usage = store
            .entries()?
            .iter()
            .map(|(k, v)| encoded_size(k, v))
            .sum::<u64>();
        log::debug!(
            "opened {:?} storage ({:?}), {} bytes in use, quota {:?}",
            kind,
            locator,
            usage,
            options.quota
        );

        Ok(Self {
            kind,
            persistent: store.is_persistent(),
            state: Mutex::new(AreaState {
                store,
                quota: QuotaAccountant::with_usage(options.quota, usage),
            }),
            sink,
        })
    }

    /// Value stored under `key`, or `None`.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.lock().store.get(key)
    }

    /// Stores `value` under `key`, coercing it to a string first.
    ///
    /// Fails with [`StorageError::QuotaExceeded`] before anything is written if
    /// the new item would not fit.
    pub fn set_item(&self, key: &str, value: impl Into<StorageValue>) -> Result<(), StorageError> {
        let value = value.into().into_storage_string();

        let event = {
            let mut state = self.lock();
            let mut area = state.store.entries()?;
            let old_value = area.get(key).cloned();
            let admission = state.quota.authorize(key, &value, old_value.as_deref())?;

            state.store.set(key, &value)?;
            state.quota.commit(admission);
            log::trace!("{:?} setItem {:?} ({:+} bytes)", self.kind, key, admission.delta);

            // Replacing keeps the key's position, same as the store.
            area.insert(key.to_string(), value.clone());
            StorageEvent::item_set(key, old_value, value, area)
        };

        self.notify(&event);
        Ok(())
    }

    /// Removes `key`. An absent key changes nothing but is still announced.
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let event = {
            let mut state = self.lock();
            let mut area = state.store.entries()?;
            let old_value = area.shift_remove(key);

            if let Some(old) = &old_value {
                state.store.delete(key)?;
                state.quota.release(encoded_size(key, old));
                log::trace!("{:?} removeItem {:?}", self.kind, key);
            }

            StorageEvent::item_removed(key, old_value, area)
        };

        self.notify(&event);
        Ok(())
    }

    /// Removes every item and resets usage to zero.
    pub fn clear(&self) -> Result<(), StorageError> {
        {
            let mut state = self.lock();
            state.store.clear()?;
            state.quota.reset();
        }
        log::trace!("{:?} clear", self.kind);

        self.notify(&StorageEvent::cleared());
        Ok(())
    }

    /// Key at `index` in insertion order.
    ///
    /// The index is truncated toward zero (`0.9` is `0`, NaN is `0`); negative
    /// or out-of-range indices give `None`.
    pub fn key(&self, index: impl Into<f64>) -> Result<Option<String>, StorageError> {
        let index = index.into();
        let index = if index.is_nan() { 0.0 } else { index.trunc() };
        if index < 0.0 || index >= usize::MAX as f64 {
            return Ok(None);
        }

        self.lock().store.key_at(index as usize)
    }

    /// Number of items.
    pub fn length(&self) -> Result<usize, StorageError> {
        self.lock().store.count()
    }

    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.lock().store.keys()
    }

    /// Copy of all items in insertion order.
    pub fn snapshot(&self) -> Result<IndexMap<String, String>, StorageError> {
        self.lock().store.entries()
    }

    /// Encoded bytes currently in use.
    pub fn usage(&self) -> u64 {
        self.lock().quota.usage()
    }

    pub fn quota(&self) -> Option<u64> {
        self.lock().quota.limit()
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// The sink this area emits to.
    pub fn emitter(&self) -> &SinkHandle {
        &self.sink
    }

    fn lock(&self) -> MutexGuard<'_, AreaState> {
        // State is only changed after every fallible step succeeded, so a
        // poisoned lock still guards consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: &StorageEvent) {
        self.sink.emit(STORAGE_EVENT, event);
    }
}
