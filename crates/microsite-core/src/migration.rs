// ── Migration orchestrator ──
//
// Applies the override mapping to site entities. `status` previews,
// `update` mutates and records each migrated site in the processed-state
// store so a second run is a no-op, `reset` clears those records.
//
// Only two conditions abort an operation: no override settings, and no
// site matching the filter. Everything else is reported per site.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::CoreError;
use crate::model::{Scheme, Site, SiteFilter, SiteId};
use crate::overrides::{OverrideSettings, Resolution};
use crate::store::{ProcessedStateStore, SiteDirectory};

/// Status column value for sites already migrated.
pub const PROCESSED: &str = "--processed--";

/// Status column value when no override applies.
pub const UNCHANGED: &str = "--";

// ── Reports ─────────────────────────────────────────────────────────

/// One line of the `status` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub id: SiteId,
    #[serde(rename = "type")]
    pub site_type: String,
    pub site_url: String,
    pub https: String,
    pub site_url_new: String,
    pub https_new: String,
}

/// Where a site ended up after `update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MigrationState {
    /// Already in the processed-state store.
    Skipped,
    /// No override applies.
    NoChange,
    Updated,
    /// Not marked processed; a later run retries it.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteOutcome {
    pub site_id: SiteId,
    pub label: String,
    pub old_url: String,
    pub new_url: Option<String>,
    pub https_new: Option<bool>,
    #[serde(flatten)]
    pub state: MigrationState,
}

impl SiteOutcome {
    fn pending(site: &Site) -> Self {
        Self {
            site_id: site.id,
            label: site.label.clone(),
            old_url: site.site_url.clone(),
            new_url: None,
            https_new: None,
            state: MigrationState::NoChange,
        }
    }

    fn with_state(mut self, state: MigrationState) -> Self {
        self.state = state;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub outcomes: Vec<SiteOutcome>,
}

impl UpdateReport {
    /// Number of sites transitioned to `Updated`.
    pub fn updated(&self) -> usize {
        self.count(|s| matches!(s, MigrationState::Updated))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, MigrationState::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, MigrationState::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&MigrationState) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.state)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ResetReport {
    /// The whole store was wiped.
    All,
    Sites {
        cleared: Vec<SiteId>,
        /// Matched but not processed.
        skipped: Vec<SiteId>,
        failed: Vec<SiteId>,
    },
}

impl ResetReport {
    /// Number of flags actually removed. `None` for a full wipe.
    pub fn cleared(&self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Sites { cleared, .. } => Some(cleared.len()),
        }
    }
}

// ── Migration ───────────────────────────────────────────────────────

/// Runs status / update / reset against injected collaborators.
pub struct Migration<'a> {
    settings: &'a OverrideSettings,
    sites: &'a mut dyn SiteDirectory,
    state: &'a mut dyn ProcessedStateStore,
}

impl<'a> Migration<'a> {
    pub fn new(
        settings: &'a OverrideSettings,
        sites: &'a mut dyn SiteDirectory,
        state: &'a mut dyn ProcessedStateStore,
    ) -> Self {
        Self {
            settings,
            sites,
            state,
        }
    }

    /// Preview what `update` would do, without touching anything.
    pub fn status(&self, filter: &SiteFilter) -> Result<Vec<StatusRow>, CoreError> {
        self.require_settings()?;
        let sites = self.load_sites(filter, "updated")?;

        let mut rows = Vec::with_capacity(sites.len());
        for site in sites {
            let (site_url_new, https_new) = if self.state.get(&site.id.to_string())? {
                (PROCESSED.to_owned(), PROCESSED.to_owned())
            } else {
                let resolution = self.resolve(&site);
                (
                    resolution.site_url.unwrap_or_else(|| UNCHANGED.to_owned()),
                    resolution
                        .https
                        .map_or(UNCHANGED, |https| Scheme::from(https).yes_no())
                        .to_owned(),
                )
            };

            rows.push(StatusRow {
                id: site.id,
                https: site.site_scheme.yes_no().to_owned(),
                site_type: site.site_type,
                site_url: site.site_url,
                site_url_new,
                https_new,
            });
        }
        Ok(rows)
    }

    /// Apply the overrides to every matching, not yet processed site.
    pub fn update(&mut self, filter: &SiteFilter) -> Result<UpdateReport, CoreError> {
        self.require_settings()?;
        let sites = self.load_sites(filter, "updated")?;

        let mut report = UpdateReport::default();
        for site in sites {
            let outcome = self.update_site(site);
            report.outcomes.push(outcome);
        }

        debug!(
            updated = report.updated(),
            skipped = report.skipped(),
            failed = report.failed(),
            "update finished"
        );
        Ok(report)
    }

    /// Forget the processed flag of matching sites, or of every site when
    /// the filter is empty.
    pub fn reset(&mut self, filter: &SiteFilter) -> Result<ResetReport, CoreError> {
        if filter.is_empty() {
            self.state.delete_all()?;
            info!("all micro sites status reset");
            return Ok(ResetReport::All);
        }

        let sites = self.load_sites(filter, "reset")?;
        let mut cleared = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();

        for site in sites {
            let key = site.id.to_string();
            let result = self.state.get(&key).and_then(|processed| {
                if processed {
                    self.state.delete(&key).map(|()| true)
                } else {
                    Ok(false)
                }
            });

            match result {
                Ok(true) => {
                    info!(
                        site_id = %site.id,
                        name = %site.label,
                        site_url = %site.site_url,
                        "resetting status of micro site"
                    );
                    cleared.push(site.id);
                }
                Ok(false) => {
                    info!(
                        site_id = %site.id,
                        name = %site.label,
                        site_url = %site.site_url,
                        "no processed status found for micro site, skipping"
                    );
                    skipped.push(site.id);
                }
                Err(e) => {
                    error!(site_id = %site.id, error = %e, "failure when resetting micro site");
                    failed.push(site.id);
                }
            }
        }

        Ok(ResetReport::Sites {
            cleared,
            skipped,
            failed,
        })
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn require_settings(&self) -> Result<(), CoreError> {
        if self.settings.is_empty() {
            error!("no override settings found to override micro site URL");
            return Err(CoreError::NoOverrideSettings);
        }
        Ok(())
    }

    fn load_sites(&self, filter: &SiteFilter, action: &'static str) -> Result<Vec<Site>, CoreError> {
        let sites = self.sites.list(filter)?;
        if sites.is_empty() {
            error!(?filter, "no micro sites found to be {action}");
            return Err(CoreError::NoSitesFound { action });
        }
        Ok(sites)
    }

    fn resolve(&self, site: &Site) -> Resolution {
        let resolution = self.settings.resolve(site);
        for issue in &resolution.issues {
            error!(site_id = %site.id, tier = %issue.tier, "{issue}");
        }
        resolution
    }

    fn update_site(&mut self, mut site: Site) -> SiteOutcome {
        let key = site.id.to_string();
        let mut outcome = SiteOutcome::pending(&site);

        match self.state.get(&key) {
            Ok(false) => {}
            Ok(true) => {
                info!(
                    name = %site.label,
                    site_url = %site.site_url,
                    "micro site already processed, skipping"
                );
                return outcome.with_state(MigrationState::Skipped);
            }
            Err(e) => {
                error!(site_id = %site.id, error = %e, "cannot read processed status");
                return outcome.with_state(MigrationState::Failed {
                    message: e.to_string(),
                });
            }
        }

        let resolution = self.resolve(&site);
        if resolution.is_empty() {
            debug!(site_id = %site.id, "no override applies");
            return outcome.with_state(MigrationState::NoChange);
        }

        outcome.new_url.clone_from(&resolution.site_url);
        outcome.https_new = resolution.https;
        if let Some(https) = resolution.https {
            site.site_scheme = Scheme::from(https);
        }
        if let Some(url) = resolution.site_url {
            site.site_url = url;
        }

        if let Err(e) = self.sites.save(&site) {
            error!(
                site_id = %site.id,
                site_url = %outcome.old_url,
                "failure when saving micro site with message: {e}"
            );
            return outcome.with_state(MigrationState::Failed {
                message: e.to_string(),
            });
        }

        if let Err(e) = self.state.set(&key, true) {
            error!(site_id = %site.id, error = %e, "micro site saved but not marked processed");
            return outcome.with_state(MigrationState::Failed {
                message: format!("site saved but processed flag not recorded: {e}"),
            });
        }

        info!(
            name = %site.label,
            site_id = %site.id,
            site_url = %outcome.old_url,
            site_url_new = %site.site_url,
            "processing micro site with new URL"
        );
        outcome.with_state(MigrationState::Updated)
    }
}
