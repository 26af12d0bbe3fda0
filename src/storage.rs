//! HTML5 **localStorage** and **sessionStorage** outside a browser.
//!
//! # Concepts
//!
//! - **Local storage**: persistent key/value data in a SQLite file, or in memory
//!   when no file is given.
//! - **Session storage**: ephemeral key/value data that lives as long as the
//!   [`Storage`] value.
//!
//! Both are a [`Storage`]: an ordered string → string map with the DOM
//! operations `getItem`, `setItem`, `removeItem`, `clear`, `key` and `length`,
//! an optional byte quota (two bytes per UTF-16 code unit of key and value) and
//! a `storage` event emitted to a [`NotificationSink`] after every mutation.
//!
//! # Available types
//!
//! - [`Storage`]: one storage area.
//! - [`StorageArea`]: object-safe trait over storage areas.
//! - [`StorageValue`]: dynamically typed values and their string coercion.
//! - [`StorageEvent`]: payload of the `storage` event.
//! - [`NotificationSink`], [`Emitter`]: event dispatch.
//! - [`QuotaAccountant`]: usage bookkeeping against a limit.
//! - [`BackingStore`], [`SqliteStore`], [`MemoryStore`]: persistence.
//! - [`Locator`]: where an area keeps its data.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gosub_webstorage::config::StorageOptions;
//! use gosub_webstorage::storage::{create_storage, StorageEvent, NotificationSink, STORAGE_EVENT};
//!
//! let storages = create_storage("local.sqlite", StorageOptions::builder().quota(5 * 1024 * 1024).build())?;
//!
//! storages.emitter.add_listener(STORAGE_EVENT, Arc::new(|ev: &StorageEvent| {
//!     println!("{:?} changed: {:?} -> {:?}", ev.key, ev.old_value, ev.new_value);
//! }));
//!
//! storages.local_storage.set_item("greeting", "hello")?;
//! storages.session_storage.set_item("visits", 1)?;
//! assert_eq!(storages.local_storage.key(0)?.as_deref(), Some("greeting"));
//! # Ok::<(), gosub_webstorage::errors::StorageError>(())
//! ```

/// Storage area trait, defining the key/value storage interface.
pub mod area;
/// Dynamic method dispatch with DOM argument handling.
pub mod bindings;
/// Notification sinks.
pub mod emitter;
/// Event module, providing storage change events.
pub mod event;
/// Quota accounting.
pub mod quota;
/// Factory functions for local/session pairs.
pub mod service;
/// Backing store trait and locator resolution.
pub mod store;
/// Storage types
pub mod types;
/// Value coercion.
pub mod value;
/// The storage area itself.
pub mod web_storage;

/// Persistent storage backends.
pub mod local {
    /// SQLite-backed store.
    pub mod sqlite_store;
}

/// Ephemeral storage backends.
pub mod session {
    /// In-memory store.
    pub mod in_memory;
}

pub use area::StorageArea;
pub use bindings::{invoke, StorageMethod};
pub use emitter::{Emitter, Listener, ListenerId, NotificationSink, SinkHandle, Subscription};
pub use event::{StorageEvent, STORAGE_EVENT};
pub use local::sqlite_store::SqliteStore;
pub use quota::{encoded_size, Admission, QuotaAccountant};
pub use service::{create_local_storage, create_session_storage, create_storage, create_storages, Storages};
pub use session::in_memory::MemoryStore;
pub use store::BackingStore;
pub use types::{Locator, StorageKind, MEMORY_LOCATOR};
pub use value::StorageValue;
pub use web_storage::Storage;
