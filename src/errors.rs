/// Errors raised by storage areas, their backing stores and the factory functions.
///
/// Display strings follow the messages a browser puts on the matching DOM
/// exception, and [`StorageError::name`] gives the DOM exception name.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(
        "Failed to execute '{}' on 'Storage': {} argument{} required, but only {} present.",
        .method,
        .required,
        plural(.required),
        .present
    )]
    Arity {
        method: &'static str,
        required: usize,
        present: usize,
    },

    #[error("Storage.{0} is not a function")]
    UnknownMethod(String),

    #[error("Invalid storage configuration: {0}")]
    Configuration(String),

    #[error("Failed to execute 'setItem' on 'Storage': Setting the value of '{key}' exceeded the quota.")]
    QuotaExceeded { key: String },

    #[error("Database error: {0}")]
    Database(#[from] r2d2_sqlite::rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Name of the DOM exception a script host should surface for this error.
    pub fn name(&self) -> &'static str {
        match self {
            StorageError::Arity { .. } | StorageError::UnknownMethod(_) | StorageError::Configuration(_) => {
                "TypeError"
            }
            StorageError::QuotaExceeded { .. } => "QuotaExceededError",
            _ => "UnknownError",
        }
    }
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}
