// ── Domain model ──
//
// Canonical types shared by the migration, membership and store layers.

pub mod content;
pub mod filter;
pub mod site;

pub use content::ContentEntity;
pub use filter::SiteFilter;
pub use site::{NewSite, Scheme, Site, SiteId};
