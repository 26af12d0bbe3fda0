use crate::errors::StorageError;

/// Byte cost of an item: two bytes per UTF-16 code unit of key and value.
pub fn encoded_size(key: &str, value: &str) -> u64 {
    2 * (key.encode_utf16().count() + value.encode_utf16().count()) as u64
}

/// Result of a successful [`QuotaAccountant::authorize`] call. Hand it back to
/// [`QuotaAccountant::commit`] once the write went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admission {
    /// Signed change in usage the write will cause.
    pub delta: i64,
    /// Encoded size of the item being replaced (0 when the key is new).
    pub old_size: u64,
    /// Encoded size of the item after the write.
    pub new_size: u64,
}

/// Tracks encoded byte usage of one storage area against an optional limit.
#[derive(Clone, Debug, Default)]
pub struct QuotaAccountant {
    limit: Option<u64>,
    usage: u64,
}

impl QuotaAccountant {
    pub fn new(limit: Option<u64>) -> Self {
        Self { limit, usage: 0 }
    }

    /// Starts from usage that already exists, e.g. items loaded from a database file.
    pub fn with_usage(limit: Option<u64>, usage: u64) -> Self {
        Self { limit, usage }
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn usage(&self) -> u64 {
        self.usage
    }

    /// Bytes that can still be written, `None` when unlimited.
    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.usage))
    }

    /// Checks whether writing `new_value` under `key` fits, given the value
    /// currently stored there. Does not change any state.
    pub fn authorize(&self, key: &str, new_value: &str, old_value: Option<&str>) -> Result<Admission, StorageError> {
        let new_size = encoded_size(key, new_value);
        let old_size = old_value.map_or(0, |old| encoded_size(key, old));
        let delta = new_size as i64 - old_size as i64;

        if let Some(limit) = self.limit {
            let projected = self.usage.saturating_sub(old_size) + new_size;
            // Writes that shrink usage are always let through, even when an area
            // was opened over data that is already above its limit.
            if delta > 0 && projected > limit {
                log::debug!(
                    "quota exceeded for key {:?}: {} + {} > {}",
                    key,
                    self.usage,
                    delta,
                    limit
                );
                return Err(StorageError::QuotaExceeded { key: key.to_string() });
            }
        }

        Ok(Admission {
            delta,
            old_size,
            new_size,
        })
    }

    pub fn commit(&mut self, admission: Admission) {
        self.usage = self.usage.saturating_sub(admission.old_size) + admission.new_size;
    }

    /// Gives back the space of a removed item.
    pub fn release(&mut self, size: u64) {
        self.usage = self.usage.saturating_sub(size);
    }

    pub fn reset(&mut self) {
        self.usage = 0;
    }
}
