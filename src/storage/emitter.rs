//! Notification sinks for storage events.
//!
//! A storage area never looks up a sink on its own; one is handed to it at
//! construction (see [`StorageOptions`](crate::config::StorageOptions)). Several
//! areas may share the same [`SinkHandle`], in which case listeners see events
//! from all of them without being able to tell which area fired.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

use super::event::{StorageEvent, STORAGE_EVENT};

const DEFAULT_CHANNEL_CAPACITY: usize = 128;

/// Callback invoked for every event on the channel it was registered on.
pub type Listener = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

/// A receiver for storage events emitted on the `storage` channel.
pub type Subscription = broadcast::Receiver<StorageEvent>;

/// Shared handle to a notification sink.
pub type SinkHandle = Arc<dyn NotificationSink>;

/// Identifies a registered listener so it can be removed again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Capability set a storage area needs from whatever broadcasts its events.
pub trait NotificationSink: Send + Sync {
    /// Registers `listener` for `channel`. Listeners run in registration order.
    fn add_listener(&self, channel: &str, listener: Listener) -> ListenerId;

    /// Invokes every listener of `channel` before returning. Returns `true` if
    /// there was at least one listener.
    fn emit(&self, channel: &str, event: &StorageEvent) -> bool;

    /// Drops the listeners of `channel`, or of every channel when `None`.
    fn remove_all_listeners(&self, channel: Option<&str>);
}

struct Registration {
    id: ListenerId,
    channel: String,
    listener: Listener,
}

/// Default in-process [`NotificationSink`].
///
/// Listeners are called synchronously from [`emit`](NotificationSink::emit). A
/// listener that panics is logged and skipped; the others still run. Events on
/// the `storage` channel are also forwarded to receivers from [`Emitter::subscribe`].
pub struct Emitter {
    listeners: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
    tx: broadcast::Sender<StorageEvent>,
}

impl Default for Emitter {
    fn default() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            tx,
        }
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.lock().len())
            .finish_non_exhaustive()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for [`add_listener`](NotificationSink::add_listener) taking a plain closure.
    pub fn on<F>(&self, channel: &str, f: F) -> ListenerId
    where
        F: Fn(&StorageEvent) + Send + Sync + 'static,
    {
        self.add_listener(channel, Arc::new(f))
    }

    /// Removes a single listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut guard = self.lock();
        let before = guard.len();
        guard.retain(|r| r.id != id);
        guard.len() != before
    }

    pub fn listener_count(&self, channel: &str) -> usize {
        self.lock().iter().filter(|r| r.channel == channel).count()
    }

    /// Channel receiver for `storage` events. Receivers lag rather than block
    /// when they fall behind.
    pub fn subscribe(&self) -> Subscription {
        self.tx.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationSink for Emitter {
    fn add_listener(&self, channel: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push(Registration {
            id,
            channel: channel.to_string(),
            listener,
        });
        id
    }

    fn emit(&self, channel: &str, event: &StorageEvent) -> bool {
        // Listeners are cloned out so they can register or remove listeners themselves.
        let listeners: Vec<Listener> = self
            .lock()
            .iter()
            .filter(|r| r.channel == channel)
            .map(|r| r.listener.clone())
            .collect();

        for listener in &listeners {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(event))) {
                let msg = panic
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("listener panicked");
                log::error!("storage listener on channel '{}' panicked: {}", channel, msg);
            }
        }

        if channel == STORAGE_EVENT {
            // send() only fails when nobody subscribed, which is fine.
            let _ = self.tx.send(event.clone());
        }

        !listeners.is_empty()
    }

    fn remove_all_listeners(&self, channel: Option<&str>) {
        let mut guard = self.lock();
        match channel {
            Some(channel) => guard.retain(|r| r.channel != channel),
            None => guard.clear(),
        }
    }
}
