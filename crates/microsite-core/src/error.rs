// ── Core error types ──
//
// User-facing errors from microsite-core. Per-site problems during a
// migration are reported as outcomes, not errors; only the upfront
// short-circuits and collaborator failures surface here.

use thiserror::Error;

use crate::model::SiteId;
use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("No override settings found to override micro site URL")]
    NoOverrideSettings,

    #[error("No micro sites found to be {action}")]
    NoSitesFound { action: &'static str },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Invalid site id '{value}': expected a non-negative integer")]
    InvalidSiteId { value: String },

    #[error("Invalid site {field}: {reason}")]
    InvalidSite { field: String, reason: String },

    #[error("Site not found: {id}")]
    SiteNotFound { id: SiteId },

    // ── Collaborator errors ──────────────────────────────────────────
    #[error(transparent)]
    Store(#[from] StoreError),
}
