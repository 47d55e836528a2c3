// ── Site domain type ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ── SiteId ──────────────────────────────────────────────────────────

/// Stable numeric identifier of a micro site, assigned by the directory.
///
/// The decimal string form doubles as the processed-state key and as the
/// lookup key of the per-id override tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(u64);

impl SiteId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SiteId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| CoreError::InvalidSiteId {
                value: s.to_owned(),
            })
    }
}

// ── Scheme ──────────────────────────────────────────────────────────

/// Whether a micro site is served over HTTPS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn is_secure(self) -> bool {
        matches!(self, Self::Https)
    }

    /// Human-readable yes/no used by the status table.
    pub fn yes_no(self) -> &'static str {
        if self.is_secure() { "Yes" } else { "No" }
    }
}

impl From<bool> for Scheme {
    fn from(secure: bool) -> Self {
        if secure { Self::Https } else { Self::Http }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Https => f.write_str("https"),
        }
    }
}

// ── Site ────────────────────────────────────────────────────────────

/// One micro site: a hostname served from the shared content pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    /// Site type (bundle). Immutable once the site exists.
    #[serde(rename = "type")]
    pub site_type: String,
    /// Human-friendly display name.
    pub label: String,
    /// Hostname the site answers on, e.g. `one.microsite.local`.
    pub site_url: String,
    #[serde(default)]
    pub site_scheme: Scheme,
}

impl Site {
    /// Base URL including scheme, e.g. `https://one.microsite.local`.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.site_scheme, self.site_url)
    }
}

/// A site that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSite {
    #[serde(rename = "type")]
    pub site_type: String,
    pub label: String,
    pub site_url: String,
    #[serde(default)]
    pub site_scheme: Scheme,
}

impl NewSite {
    /// Reject hostnames that could never be served.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.site_type.trim().is_empty() {
            return Err(CoreError::InvalidSite {
                field: "type".into(),
                reason: "site type cannot be empty".into(),
            });
        }
        url::Host::parse(&self.site_url).map_err(|e| CoreError::InvalidSite {
            field: "site_url".into(),
            reason: format!("'{}' is not a valid hostname: {e}", self.site_url),
        })?;
        Ok(())
    }

    pub fn with_id(self, id: SiteId) -> Site {
        Site {
            id,
            site_type: self.site_type,
            label: self.label,
            site_url: self.site_url,
            site_scheme: self.site_scheme,
        }
    }
}
