// ── JSON file backends ──
//
// Whole-file documents, loaded on open and rewritten on every mutation
// through a sibling temp file + rename. A missing file reads as empty.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::memory::{MemorySiteDirectory, MemoryStateStore};
use super::{ProcessedStateStore, SiteDirectory, StoreError};
use crate::model::{NewSite, Site, SiteFilter, SiteId};

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let body = serde_json::to_string_pretty(data).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, body).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

// ── FileSiteDirectory ───────────────────────────────────────────────

/// Sites stored as a JSON array.
#[derive(Debug)]
pub struct FileSiteDirectory {
    path: PathBuf,
    inner: MemorySiteDirectory,
}

impl FileSiteDirectory {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let sites: Vec<Site> = read_json(&path)?;
        tracing::debug!(path = %path.display(), count = sites.len(), "loaded site directory");
        Ok(Self {
            path,
            inner: MemorySiteDirectory::with_sites(sites),
        })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let sites = self.inner.list(&SiteFilter::all())?;
        write_json(&self.path, &sites)
    }
}

impl SiteDirectory for FileSiteDirectory {
    fn list(&self, filter: &SiteFilter) -> Result<Vec<Site>, StoreError> {
        self.inner.list(filter)
    }

    fn get(&self, id: SiteId) -> Result<Option<Site>, StoreError> {
        self.inner.get(id)
    }

    fn save(&mut self, site: &Site) -> Result<(), StoreError> {
        let previous = self.inner.get(site.id)?;
        self.inner.save(site)?;
        if let Err(e) = self.flush() {
            // Keep memory in line with what is on disk.
            if let Some(previous) = previous {
                self.inner.save(&previous)?;
            }
            return Err(e);
        }
        Ok(())
    }

    fn create(&mut self, draft: NewSite) -> Result<Site, StoreError> {
        let site = self.inner.create(draft)?;
        self.flush()?;
        Ok(site)
    }
}

// ── FileStateStore ──────────────────────────────────────────────────

/// Processed flags stored as a JSON object of `key -> bool`.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    inner: MemoryStateStore,
}

impl FileStateStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let flags: BTreeMap<String, bool> = read_json(&path)?;
        Ok(Self {
            path,
            inner: MemoryStateStore::from_flags(flags),
        })
    }

    fn flush(&self) -> Result<(), StoreError> {
        write_json(&self.path, self.inner.flags())
    }
}

impl ProcessedStateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.inner.set(key, value)?;
        self.flush()
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key)?;
        self.flush()
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.inner.delete_all()?;
        self.flush()
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.inner.keys()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Scheme;

    #[test]
    fn missing_files_open_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sites = FileSiteDirectory::open(dir.path().join("sites.json")).unwrap();
        assert!(sites.list(&SiteFilter::all()).unwrap().is_empty());
        let state = FileStateStore::open(dir.path().join("state.json")).unwrap();
        assert!(!state.get("1").unwrap());
    }

    #[test]
    fn sites_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sites.json");

        let mut sites = FileSiteDirectory::open(&path).unwrap();
        let mut site = sites
            .create(NewSite {
                site_type: "generic".into(),
                label: "One".into(),
                site_url: "one.microsite.local".into(),
                site_scheme: Scheme::Http,
            })
            .unwrap();
        site.site_url = "new-one.microsite.local".into();
        sites.save(&site).unwrap();

        let reopened = FileSiteDirectory::open(&path).unwrap();
        let loaded = reopened.get(site.id).unwrap().unwrap();
        assert_eq!(loaded.site_url, "new-one.microsite.local");
    }

    #[test]
    fn flags_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = FileStateStore::open(&path).unwrap();
        state.set("3", true).unwrap();
        state.set("4", true).unwrap();
        state.delete("4").unwrap();

        let reopened = FileStateStore::open(&path).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["3"]);
    }

    #[test]
    fn failed_flush_rolls_back_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.json");

        let mut sites = FileSiteDirectory::open(&path).unwrap();
        let mut site = sites
            .create(NewSite {
                site_type: "generic".into(),
                label: "One".into(),
                site_url: "one.microsite.local".into(),
                site_scheme: Scheme::Http,
            })
            .unwrap();

        // A directory squatting on the temp file name makes the write fail.
        fs::create_dir(dir.path().join("sites.json.tmp")).unwrap();

        site.site_url = "new-one.microsite.local".into();
        assert!(matches!(sites.save(&site), Err(StoreError::Io { .. })));

        let in_memory = sites.get(site.id).unwrap().unwrap();
        assert_eq!(in_memory.site_url, "one.microsite.local");
        let on_disk = FileSiteDirectory::open(&path).unwrap();
        assert_eq!(
            on_disk.get(site.id).unwrap().unwrap().site_url,
            "one.microsite.local"
        );
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FileSiteDirectory::open(&path),
            Err(StoreError::Malformed { .. })
        ));
    }
}
