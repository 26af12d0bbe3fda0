use std::path::{Path, PathBuf};

/// Locator that selects an in-memory store.
pub const MEMORY_LOCATOR: &str = ":memory:";

/// Where a storage area keeps its items. Resolved once when the area is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Locator {
    /// No locator given (or an empty one): ephemeral.
    #[default]
    Empty,
    /// The `:memory:` sentinel: ephemeral.
    Memory,
    /// Database file, created when missing.
    Path(PathBuf),
}

impl Locator {
    pub fn resolve(locator: Option<&str>) -> Self {
        match locator {
            None | Some("") => Locator::Empty,
            Some(MEMORY_LOCATOR) => Locator::Memory,
            Some(path) => Locator::Path(PathBuf::from(path)),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        !matches!(self, Locator::Path(_))
    }
}

impl From<Option<&str>> for Locator {
    fn from(locator: Option<&str>) -> Self {
        Locator::resolve(locator)
    }
}

impl From<&str> for Locator {
    fn from(locator: &str) -> Self {
        Locator::resolve(Some(locator))
    }
}

impl From<String> for Locator {
    fn from(locator: String) -> Self {
        Locator::resolve(Some(&locator))
    }
}

impl From<&Path> for Locator {
    fn from(path: &Path) -> Self {
        match path.to_str() {
            Some(s) => Locator::resolve(Some(s)),
            None => Locator::Path(path.to_path_buf()),
        }
    }
}

impl From<PathBuf> for Locator {
    fn from(path: PathBuf) -> Self {
        Locator::from(path.as_path())
    }
}

/// Which of the two DOM storage objects an area plays.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StorageKind {
    Local,
    Session,
}
