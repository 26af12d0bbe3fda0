use std::fmt::Debug;

use super::emitter::SinkHandle;
use super::types::{Locator, StorageKind};
use super::web_storage::Storage;
use crate::config::StorageOptions;
use crate::errors::StorageError;

/// A `localStorage` / `sessionStorage` pair reporting to one sink.
pub struct Storages {
    /// Persistent when built with a path locator.
    pub local_storage: Storage,
    /// Always in memory.
    pub session_storage: Storage,
    /// Sink both areas emit `storage` events to.
    pub emitter: SinkHandle,
}

impl Debug for Storages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storages")
            .field("local_storage", &self.local_storage)
            .field("session_storage", &self.session_storage)
            .finish_non_exhaustive()
    }
}

/// Creates a local storage area at `locator`, returning it with its sink.
pub fn create_local_storage(
    locator: impl Into<Locator>,
    mut options: StorageOptions,
) -> Result<(Storage, SinkHandle), StorageError> {
    let sink = options.resolve_emitter();
    let storage = Storage::open(StorageKind::Local, &locator.into(), options)?;
    Ok((storage, sink))
}

/// Creates an in-memory session storage area, returning it with its sink.
pub fn create_session_storage(mut options: StorageOptions) -> Result<(Storage, SinkHandle), StorageError> {
    let sink = options.resolve_emitter();
    let storage = Storage::open(StorageKind::Session, &Locator::Memory, options)?;
    Ok((storage, sink))
}

/// Creates both areas. Only local storage uses `locator`; both share one sink
/// and the same quota setting.
pub fn create_storage(locator: impl Into<Locator>, mut options: StorageOptions) -> Result<Storages, StorageError> {
    let emitter = options.resolve_emitter();
    let local_storage = Storage::open(StorageKind::Local, &locator.into(), options.clone())?;
    let session_storage = Storage::open(StorageKind::Session, &Locator::Memory, options)?;

    Ok(Storages {
        local_storage,
        session_storage,
        emitter,
    })
}

/// [`create_storage`] returning `(local, session, sink)`.
pub fn create_storages(
    locator: impl Into<Locator>,
    options: StorageOptions,
) -> Result<(Storage, Storage, SinkHandle), StorageError> {
    let Storages {
        local_storage,
        session_storage,
        emitter,
    } = create_storage(locator, options)?;
    Ok((local_storage, session_storage, emitter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Emitter, NotificationSink, StorageEvent, STORAGE_EVENT};
    use std::sync::{Arc, Mutex};

    #[test]
    fn session_is_ephemeral_even_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.sqlite");

        let pair = create_storage(path.as_path(), StorageOptions::default()).unwrap();
        assert!(pair.local_storage.is_persistent());
        assert!(!pair.session_storage.is_persistent());
        assert_eq!(pair.local_storage.kind(), StorageKind::Local);
        assert_eq!(pair.session_storage.kind(), StorageKind::Session);

        pair.local_storage.set_item("k", "local").unwrap();
        pair.session_storage.set_item("k", "session").unwrap();
        assert_eq!(pair.local_storage.get_item("k").unwrap().as_deref(), Some("local"));
        assert_eq!(pair.session_storage.get_item("k").unwrap().as_deref(), Some("session"));
    }

    #[test]
    fn pair_shares_one_sink() {
        let (local, session, sink) = create_storages(Locator::Empty, StorageOptions::default()).unwrap();
        assert!(Arc::ptr_eq(local.emitter(), &sink));
        assert!(Arc::ptr_eq(session.emitter(), &sink));

        let count = Arc::new(Mutex::new(0));
        let c = count.clone();
        sink.add_listener(STORAGE_EVENT, Arc::new(move |_: &StorageEvent| *c.lock().unwrap() += 1));

        local.set_item("a", "1").unwrap();
        session.clear().unwrap();
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn supplied_emitter_is_returned() {
        let emitter: SinkHandle = Arc::new(Emitter::new());
        let options = StorageOptions::builder().emitter(emitter.clone()).build();

        let (_local, sink) = create_local_storage(":memory:", options.clone()).unwrap();
        assert!(Arc::ptr_eq(&sink, &emitter));

        let (_session, sink) = create_session_storage(options).unwrap();
        assert!(Arc::ptr_eq(&sink, &emitter));
    }

    #[test]
    fn separate_factories_get_separate_sinks() {
        let (_a, a) = create_session_storage(StorageOptions::default()).unwrap();
        let (_b, b) = create_session_storage(StorageOptions::default()).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn quota_applies_to_both_areas() {
        let pair = create_storage("", StorageOptions::builder().quota(10).build()).unwrap();
        assert_eq!(pair.local_storage.quota(), Some(10));
        assert_eq!(pair.session_storage.quota(), Some(10));
        assert!(pair.session_storage.set_item("key", "value").is_err());
    }
}
