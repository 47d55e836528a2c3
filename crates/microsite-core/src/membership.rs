// ── Micro site membership ──
//
// Which micro sites a content entity is published on: its main site,
// secondary sites, and the "all sites" / "include master" flags.

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{ContentEntity, Site, SiteId};
use crate::store::SiteDirectory;

pub const LABEL_MASTER_INCLUDED: &str = "Yes (master included)";
pub const LABEL_MASTER_EXCLUDED: &str = "Yes (master excluded)";

/// Cache contexts the rendered membership varies by.
pub const CACHE_CONTEXTS: [&str; 2] = ["url.site", "url"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipOptions {
    /// The site serving the current request, if any.
    pub active_site: Option<SiteId>,
    pub display_active_site: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteMembership {
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_site: Option<Site>,
    pub main_site: Option<Site>,
    pub other_sites: Vec<Site>,
    pub on_all_sites: bool,
    /// Only reported for entities published on all sites.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_master: Option<bool>,
    pub all_sites_label: String,
    pub cache_tags: Vec<String>,
}

/// Resolve the membership of `entity` against `directory`.
///
/// References to sites the directory does not know are dropped.
pub fn resolve(
    entity: &ContentEntity,
    directory: &dyn SiteDirectory,
    options: &MembershipOptions,
) -> Result<SiteMembership, CoreError> {
    let main_site = match entity.site_id.as_deref().and_then(<[SiteId]>::first) {
        Some(id) => directory.get(*id)?,
        None => None,
    };

    let mut other_sites = Vec::new();
    for id in entity.field_sites.as_deref().unwrap_or_default() {
        if let Some(site) = directory.get(*id)? {
            other_sites.push(site);
        }
    }

    let active_site = match options.active_site {
        Some(id) if options.display_active_site => directory.get(id)?,
        _ => None,
    };

    let on_all_sites = is_on_all_sites(entity);
    let include_master = entity.include_master.filter(|_| on_all_sites);
    let all_sites_label = match (on_all_sites, include_master) {
        (false, _) => String::new(),
        (true, Some(false)) => LABEL_MASTER_EXCLUDED.to_owned(),
        (true, _) => LABEL_MASTER_INCLUDED.to_owned(),
    };

    let mut cache_tags = vec![entity.cache_tag()];
    for site in main_site.iter().chain(&other_sites) {
        let tag = format!("site:{}", site.id);
        if !cache_tags.contains(&tag) {
            cache_tags.push(tag);
        }
    }

    Ok(SiteMembership {
        entity: entity.cache_tag(),
        active_site,
        main_site,
        other_sites,
        on_all_sites,
        include_master,
        all_sites_label,
        cache_tags,
    })
}

fn is_on_all_sites(entity: &ContentEntity) -> bool {
    entity.field_sites_all.or(entity.site_all).unwrap_or(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Scheme;
    use crate::store::MemorySiteDirectory;
    use pretty_assertions::assert_eq;

    fn directory() -> MemorySiteDirectory {
        MemorySiteDirectory::with_sites((1..=3).map(|id| Site {
            id: SiteId::new(id),
            site_type: "generic".into(),
            label: format!("Site {id}"),
            site_url: format!("s{id}.microsite.local"),
            site_scheme: Scheme::Http,
        }))
    }

    fn node() -> ContentEntity {
        ContentEntity {
            entity_type: "node".into(),
            id: "7".into(),
            ..ContentEntity::default()
        }
    }

    #[test]
    fn entity_without_site_fields() {
        let membership = resolve(&node(), &directory(), &MembershipOptions::default()).unwrap();
        assert_eq!(membership.main_site, None);
        assert!(membership.other_sites.is_empty());
        assert!(!membership.on_all_sites);
        assert_eq!(membership.all_sites_label, "");
        assert_eq!(membership.cache_tags, vec!["node:7"]);
    }

    #[test]
    fn main_and_other_sites_are_resolved() {
        let entity = ContentEntity {
            site_id: Some(vec![SiteId::new(1), SiteId::new(2)]),
            field_sites: Some(vec![SiteId::new(2), SiteId::new(9), SiteId::new(1)]),
            ..node()
        };
        let membership = resolve(&entity, &directory(), &MembershipOptions::default()).unwrap();

        assert_eq!(membership.main_site.unwrap().id, SiteId::new(1));
        let others: Vec<_> = membership.other_sites.iter().map(|s| s.id).collect();
        assert_eq!(others, vec![SiteId::new(2), SiteId::new(1)]);
        assert_eq!(membership.cache_tags, vec!["node:7", "site:1", "site:2"]);
    }

    #[test]
    fn field_sites_all_wins_over_site_all() {
        let entity = ContentEntity {
            field_sites_all: Some(false),
            site_all: Some(true),
            ..node()
        };
        let membership = resolve(&entity, &directory(), &MembershipOptions::default()).unwrap();
        assert!(!membership.on_all_sites);

        let entity = ContentEntity {
            site_all: Some(true),
            ..node()
        };
        let membership = resolve(&entity, &directory(), &MembershipOptions::default()).unwrap();
        assert!(membership.on_all_sites);
        assert_eq!(membership.all_sites_label, LABEL_MASTER_INCLUDED);
    }

    #[test]
    fn include_master_shapes_the_label() {
        let entity = ContentEntity {
            site_all: Some(true),
            include_master: Some(false),
            ..node()
        };
        let membership = resolve(&entity, &directory(), &MembershipOptions::default()).unwrap();
        assert_eq!(membership.include_master, Some(false));
        assert_eq!(membership.all_sites_label, LABEL_MASTER_EXCLUDED);

        let entity = ContentEntity {
            include_master: Some(true),
            ..node()
        };
        let membership = resolve(&entity, &directory(), &MembershipOptions::default()).unwrap();
        assert_eq!(membership.include_master, None);
        assert_eq!(membership.all_sites_label, "");
    }

    #[test]
    fn active_site_only_when_displayed() {
        let hidden = MembershipOptions {
            active_site: Some(SiteId::new(3)),
            display_active_site: false,
        };
        let membership = resolve(&node(), &directory(), &hidden).unwrap();
        assert_eq!(membership.active_site, None);

        let shown = MembershipOptions {
            display_active_site: true,
            ..hidden
        };
        let membership = resolve(&node(), &directory(), &shown).unwrap();
        assert_eq!(membership.active_site.unwrap().id, SiteId::new(3));

    }

    #[test]
    fn unknown_active_site_is_dropped() {
        let entity = ContentEntity {
            site_id: Some(vec![SiteId::new(1)]),
            ..node()
        };
        let unknown = MembershipOptions {
            active_site: Some(SiteId::new(42)),
            display_active_site: true,
        };
        let membership = resolve(&entity, &directory(), &unknown).unwrap();
        assert_eq!(membership.active_site, None);
        assert_eq!(membership.main_site.unwrap().id, SiteId::new(1));
    }
}
