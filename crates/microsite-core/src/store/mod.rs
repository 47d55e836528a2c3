// ── Collaborator contracts ──
//
// The migration never talks to a concrete backend. A `SiteDirectory`
// owns site entities; a `ProcessedStateStore` is the flat key-value
// side store recording which sites were already migrated.

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{NewSite, Site, SiteFilter, SiteId};

pub use file::{FileSiteDirectory, FileStateStore};
pub use memory::{MemorySiteDirectory, MemoryStateStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Site {id} does not exist")]
    UnknownSite { id: SiteId },

    #[error("Write rejected: {message}")]
    Rejected { message: String },
}

/// CRUD and filtered listing of site entities.
pub trait SiteDirectory {
    /// Sites matching `filter`, ordered by id.
    fn list(&self, filter: &SiteFilter) -> Result<Vec<Site>, StoreError>;

    fn get(&self, id: SiteId) -> Result<Option<Site>, StoreError>;

    /// Persist an existing site. Atomic per site.
    fn save(&mut self, site: &Site) -> Result<(), StoreError>;

    /// Store a new site under the next free id.
    fn create(&mut self, draft: NewSite) -> Result<Site, StoreError>;
}

/// String-keyed boolean flags. Unknown keys read as `false`.
pub trait ProcessedStateStore {
    fn get(&self, key: &str) -> Result<bool, StoreError>;

    fn set(&mut self, key: &str, value: bool) -> Result<(), StoreError>;

    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    fn delete_all(&mut self) -> Result<(), StoreError>;

    /// All keys currently flagged, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
