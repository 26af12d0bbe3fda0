pub mod config;
pub mod errors;
pub mod storage;

pub use config::StorageOptions;
pub use errors::StorageError;
pub use storage::*;
