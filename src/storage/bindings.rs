//! Dynamic entry point for script hosts.
//!
//! A host that forwards calls like `localStorage.setItem(...)` passes the method
//! name and whatever arguments the script supplied. Argument counts are checked
//! first, then arguments are coerced the way the DOM does (keys to strings,
//! indices to numbers), then the typed [`Storage`] method runs. Extra arguments
//! are ignored.

use std::fmt;
use std::str::FromStr;

use super::value::StorageValue;
use super::web_storage::Storage;
use crate::errors::StorageError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageMethod {
    GetItem,
    SetItem,
    RemoveItem,
    Clear,
    Key,
    /// The `length` attribute getter.
    Length,
}

impl StorageMethod {
    pub fn name(self) -> &'static str {
        match self {
            StorageMethod::GetItem => "getItem",
            StorageMethod::SetItem => "setItem",
            StorageMethod::RemoveItem => "removeItem",
            StorageMethod::Clear => "clear",
            StorageMethod::Key => "key",
            StorageMethod::Length => "length",
        }
    }

    /// Number of arguments the method requires.
    pub fn arity(self) -> usize {
        match self {
            StorageMethod::SetItem => 2,
            StorageMethod::GetItem | StorageMethod::RemoveItem | StorageMethod::Key => 1,
            StorageMethod::Clear | StorageMethod::Length => 0,
        }
    }
}

impl fmt::Display for StorageMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StorageMethod {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "getItem" => Ok(StorageMethod::GetItem),
            "setItem" => Ok(StorageMethod::SetItem),
            "removeItem" => Ok(StorageMethod::RemoveItem),
            "clear" => Ok(StorageMethod::Clear),
            "key" => Ok(StorageMethod::Key),
            "length" => Ok(StorageMethod::Length),
            other => Err(StorageError::UnknownMethod(other.to_string())),
        }
    }
}

/// Runs `method` on `storage` with dynamically typed arguments.
///
/// Returns what a script would see: the string or `Null` for `getItem`/`key`,
/// a number for `length`, `Undefined` for the mutators.
pub fn invoke(storage: &Storage, method: StorageMethod, args: &[StorageValue]) -> Result<StorageValue, StorageError> {
    let required = method.arity();
    if args.len() < required {
        return Err(StorageError::Arity {
            method: method.name(),
            required,
            present: args.len(),
        });
    }

    let found = |v: Option<String>| v.map_or(StorageValue::Null, StorageValue::String);

    match method {
        StorageMethod::GetItem => Ok(found(storage.get_item(&args[0].to_storage_string())?)),
        StorageMethod::SetItem => {
            storage.set_item(&args[0].to_storage_string(), args[1].clone())?;
            Ok(StorageValue::Undefined)
        }
        StorageMethod::RemoveItem => {
            storage.remove_item(&args[0].to_storage_string())?;
            Ok(StorageValue::Undefined)
        }
        StorageMethod::Clear => {
            storage.clear()?;
            Ok(StorageValue::Undefined)
        }
        StorageMethod::Key => Ok(found(storage.key(args[0].to_number())?)),
        StorageMethod::Length => Ok(StorageValue::Number(storage.length()? as f64)),
    }
}

impl Storage {
    /// Looks `method` up by its DOM name and [`invoke`]s it.
    pub fn call(&self, method: &str, args: &[StorageValue]) -> Result<StorageValue, StorageError> {
        invoke(self, method.parse()?, args)
    }
}
