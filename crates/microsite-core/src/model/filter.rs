// ── Site selection ──

use serde::Serialize;

use super::site::{Site, SiteId};
use crate::error::CoreError;

/// Restricts an operation to sites of some types and/or some ids.
///
/// Both lists empty means every site. When both are given a site must
/// match one type AND one id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteFilter {
    pub types: Vec<String>,
    pub ids: Vec<SiteId>,
}

impl SiteFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from the comma-separated command arguments.
    pub fn parse(types: &str, ids: &str) -> Result<Self, CoreError> {
        let ids = split_list(ids)
            .map(str::parse)
            .collect::<Result<Vec<SiteId>, _>>()?;
        Ok(Self {
            types: split_list(types).map(str::to_owned).collect(),
            ids,
        })
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = SiteId>) -> Self {
        self.ids = ids.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.ids.is_empty()
    }

    pub fn matches(&self, site: &Site) -> bool {
        let type_ok = self.types.is_empty() || self.types.iter().any(|t| *t == site.site_type);
        let id_ok = self.ids.is_empty() || self.ids.contains(&site.id);
        type_ok && id_ok
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
