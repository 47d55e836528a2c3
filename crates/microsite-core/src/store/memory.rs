// ── In-memory backends ──
//
// Used by tests and by embedders that manage persistence themselves.

use std::collections::{BTreeMap, BTreeSet};

use super::{ProcessedStateStore, SiteDirectory, StoreError};
use crate::model::{NewSite, Site, SiteFilter, SiteId};

#[derive(Debug, Default, Clone)]
pub struct MemorySiteDirectory {
    sites: BTreeMap<SiteId, Site>,
    failing: BTreeSet<SiteId>,
}

impl MemorySiteDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory holding `sites` as-is, ids included.
    pub fn with_sites(sites: impl IntoIterator<Item = Site>) -> Self {
        Self {
            sites: sites.into_iter().map(|s| (s.id, s)).collect(),
            failing: BTreeSet::new(),
        }
    }

    /// Make every subsequent `save` of `id` fail.
    pub fn fail_saves_for(&mut self, id: SiteId) {
        self.failing.insert(id);
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    fn next_id(&self) -> SiteId {
        self.sites
            .keys()
            .next_back()
            .map_or(SiteId::new(1), |id| id.next())
    }
}

impl SiteDirectory for MemorySiteDirectory {
    fn list(&self, filter: &SiteFilter) -> Result<Vec<Site>, StoreError> {
        Ok(self
            .sites
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    fn get(&self, id: SiteId) -> Result<Option<Site>, StoreError> {
        Ok(self.sites.get(&id).cloned())
    }

    fn save(&mut self, site: &Site) -> Result<(), StoreError> {
        if self.failing.contains(&site.id) {
            return Err(StoreError::Rejected {
                message: format!("site {} is read-only", site.id),
            });
        }
        let slot = self
            .sites
            .get_mut(&site.id)
            .ok_or(StoreError::UnknownSite { id: site.id })?;
        *slot = site.clone();
        Ok(())
    }

    fn create(&mut self, draft: NewSite) -> Result<Site, StoreError> {
        let site = draft.with_id(self.next_id());
        self.sites.insert(site.id, site.clone());
        Ok(site)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStateStore {
    flags: BTreeMap<String, bool>,
    failing: BTreeSet<String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_flags(flags: BTreeMap<String, bool>) -> Self {
        Self {
            flags,
            failing: BTreeSet::new(),
        }
    }

    /// Make every subsequent `set` or `delete` of `key` fail.
    pub fn fail_writes_for(&mut self, key: impl Into<String>) {
        self.failing.insert(key.into());
    }

    fn check_writable(&self, key: &str) -> Result<(), StoreError> {
        if self.failing.contains(key) {
            return Err(StoreError::Rejected {
                message: format!("processed flag {key} is read-only"),
            });
        }
        Ok(())
    }

    pub(crate) fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }
}

impl ProcessedStateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.flags.get(key).copied().unwrap_or(false))
    }

    fn set(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.flags.insert(key.to_owned(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.flags.remove(key);
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.flags.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .flags
            .iter()
            .filter(|(_, v)| **v)
            .map(|(k, _)| k.clone())
            .collect())
    }
}
