//! Domain logic for serving many micro sites from one content pool.
//!
//! - **[`rewrite`]**: derives a new hostname from an old one with the
//!   `prefix`, `subdomain` or `tld` method.
//! - **[`overrides`]**: the operator's override mapping and its tiered
//!   resolution (site id > site URL > site type > `global`).
//! - **[`Migration`]**: `status` / `update` / `reset` over a
//!   [`SiteDirectory`] and a [`ProcessedStateStore`]. Updates are
//!   idempotent: migrated sites are recorded and skipped on later runs.
//! - **[`membership`]**: which micro sites a content entity belongs to.
//! - **[`store`]**: collaborator traits plus in-memory and JSON-file
//!   backends.

pub mod error;
pub mod membership;
pub mod migration;
pub mod model;
pub mod overrides;
pub mod rewrite;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use membership::{MembershipOptions, SiteMembership};
pub use migration::{
    Migration, MigrationState, ResetReport, SiteOutcome, StatusRow, UpdateReport,
};
pub use model::{ContentEntity, NewSite, Scheme, Site, SiteFilter, SiteId};
pub use overrides::{ConfigIssue, OverrideRecord, OverrideSettings, Resolution, Tier};
pub use rewrite::{Method, RewriteError, rewrite};
pub use store::{
    FileSiteDirectory, FileStateStore, MemorySiteDirectory, MemoryStateStore,
    ProcessedStateStore, SiteDirectory, StoreError,
};
