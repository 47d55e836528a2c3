// ── Override settings ──
//
// Operator-supplied mapping describing the desired URL and scheme of
// micro sites. Keys are tried in a fixed precedence: site id, current
// site URL, site type, then the literal `global`. Each field (URL,
// scheme) is taken from the first tier that provides it.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, VariantNames};
use thiserror::Error;

use crate::model::Site;
use crate::rewrite::{self, Method, RewriteError};

/// Key of the catch-all tier.
pub const GLOBAL_KEY: &str = "global";

// ── OverrideRecord ──────────────────────────────────────────────────

/// One entry of the override mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRecord {
    /// Literal replacement URL. Takes priority over `method` + `pattern`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    /// Rewrite method name: `prefix`, `subdomain` or `tld`. Kept as a raw
    /// string so an unknown value is reported per site instead of
    /// rejecting the whole configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<bool>,
}

impl OverrideRecord {
    pub fn rewrite(method: Method, pattern: impl Into<String>) -> Self {
        Self {
            method: Some(method.to_string()),
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn direct(site_url: impl Into<String>) -> Self {
        Self {
            site_url: Some(site_url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_https(mut self, https: bool) -> Self {
        self.https = Some(https);
        self
    }

    /// The URL this record proposes for a site currently at `old_url`.
    ///
    /// `Ok(None)` when the record carries no URL instructions at all.
    pub fn site_url_for(&self, old_url: &str) -> Result<Option<String>, OverrideProblem> {
        if let Some(url) = non_empty(self.site_url.as_deref()) {
            return Ok(Some(url.to_owned()));
        }

        match (non_empty(self.method.as_deref()), non_empty(self.pattern.as_deref())) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(OverrideProblem::MissingMethod),
            (Some(_), None) => Err(OverrideProblem::MissingPattern),
            (Some(method), Some(pattern)) => {
                let method: Method = method
                    .parse()
                    .map_err(|_| OverrideProblem::InvalidMethod(method.to_owned()))?;
                Ok(Some(rewrite::rewrite(old_url, pattern, method)?))
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideProblem {
    #[error("no method entry found")]
    MissingMethod,

    #[error("no pattern entry found")]
    MissingPattern,

    #[error("method '{0}' is not valid, method must be one of: {variants}", variants = Method::VARIANTS.join(", "))]
    InvalidMethod(String),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

// ── Tiers ───────────────────────────────────────────────────────────

/// A lookup tier of the override mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Id,
    Url,
    Type,
    Global,
}

impl Tier {
    /// Resolution order, highest priority first.
    pub const PRECEDENCE: [Tier; 4] = [Tier::Id, Tier::Url, Tier::Type, Tier::Global];

    /// The mapping key this tier looks up for `site`.
    pub fn key(self, site: &Site) -> Cow<'_, str> {
        match self {
            Self::Id => Cow::Owned(site.id.to_string()),
            Self::Url => Cow::Borrowed(site.site_url.as_str()),
            Self::Type => Cow::Borrowed(site.site_type.as_str()),
            Self::Global => Cow::Borrowed(GLOBAL_KEY),
        }
    }
}

// ── Resolution ──────────────────────────────────────────────────────

/// A misconfigured override entry met while resolving a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    pub tier: Tier,
    pub key: String,
    #[serde(serialize_with = "serialize_display")]
    pub problem: OverrideProblem,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "override_url['{}']: {}", self.key, self.problem)
    }
}

fn serialize_display<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// What the override mapping asks for one site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub site_url: Option<String>,
    pub https: Option<bool>,
    pub url_tier: Option<Tier>,
    pub https_tier: Option<Tier>,
    pub issues: Vec<ConfigIssue>,
}

impl Resolution {
    /// Nothing to change for this site.
    pub fn is_empty(&self) -> bool {
        self.site_url.is_none() && self.https.is_none()
    }
}

// ── OverrideSettings ────────────────────────────────────────────────

/// The full override mapping, read once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideSettings(BTreeMap<String, OverrideRecord>);

impl OverrideSettings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, record: OverrideRecord) -> Self {
        self.0.insert(key.into(), record);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, record: OverrideRecord) {
        self.0.insert(key.into(), record);
    }

    pub fn get(&self, key: &str) -> Option<&OverrideRecord> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries that apply to `site`, in precedence order.
    pub fn matching<'a>(
        &'a self,
        site: &'a Site,
    ) -> impl Iterator<Item = (Tier, &'a str, &'a OverrideRecord)> + 'a {
        Tier::PRECEDENCE.into_iter().filter_map(move |tier| {
            let key = tier.key(site);
            self.0
                .get_key_value(key.as_ref())
                .map(|(k, record)| (tier, k.as_str(), record))
        })
    }

    /// Resolve the new URL and scheme for `site`.
    ///
    /// The first tier carrying any URL instruction owns the URL, even when
    /// that instruction is broken: lower tiers are then only consulted for
    /// `https`, so a misconfigured specific rule never lets a broader one
    /// rewrite the site.
    pub fn resolve(&self, site: &Site) -> Resolution {
        let mut resolution = Resolution::default();
        let mut url_claimed = false;

        for (tier, key, record) in self.matching(site) {
            if !url_claimed {
                match record.site_url_for(&site.site_url) {
                    Ok(Some(url)) => {
                        url_claimed = true;
                        resolution.site_url = Some(url);
                        resolution.url_tier = Some(tier);
                    }
                    Ok(None) => {}
                    Err(problem) => {
                        url_claimed = true;
                        resolution.url_tier = Some(tier);
                        resolution.issues.push(ConfigIssue {
                            tier,
                            key: key.to_owned(),
                            problem,
                        });
                    }
                }
            }

            if resolution.https.is_none() {
                if let Some(https) = record.https {
                    resolution.https = Some(https);
                    resolution.https_tier = Some(tier);
                }
            }

            if url_claimed && resolution.https.is_some() {
                break;
            }
        }

        resolution
    }
}

impl<K: Into<String>> FromIterator<(K, OverrideRecord)> for OverrideSettings {
    fn from_iter<I: IntoIterator<Item = (K, OverrideRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Scheme, SiteId};
    use pretty_assertions::assert_eq;

    fn site() -> Site {
        Site {
            id: SiteId::new(5),
            site_type: "generic".into(),
            label: "Five".into(),
            site_url: "one.microsite.local".into(),
            site_scheme: Scheme::Http,
        }
    }

    #[test]
    fn empty_settings_resolve_to_nothing() {
        let resolution = OverrideSettings::new().resolve(&site());
        assert!(resolution.is_empty());
        assert!(resolution.issues.is_empty());
    }

    #[test]
    fn id_tier_beats_global() {
        let settings = OverrideSettings::new()
            .with("5", OverrideRecord::direct("five.example.org"))
            .with(GLOBAL_KEY, OverrideRecord::rewrite(Method::Prefix, "new"));
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url.as_deref(), Some("five.example.org"));
        assert_eq!(resolution.url_tier, Some(Tier::Id));
    }

    #[test]
    fn id_tier_beats_url_tier() {
        let settings = OverrideSettings::new()
            .with("one.microsite.local", OverrideRecord::direct("by-url.org"))
            .with("5", OverrideRecord::direct("by-id.org"));
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url.as_deref(), Some("by-id.org"));
    }

    #[test]
    fn url_tier_beats_type_tier() {
        let settings = OverrideSettings::new()
            .with("generic", OverrideRecord::rewrite(Method::Tld, "org"))
            .with("one.microsite.local", OverrideRecord::direct("by-url.org"));
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url.as_deref(), Some("by-url.org"));
        assert_eq!(resolution.url_tier, Some(Tier::Url));
    }

    #[test]
    fn type_tier_rewrites_with_method() {
        let settings = OverrideSettings::new()
            .with("generic", OverrideRecord::rewrite(Method::Subdomain, "new"))
            .with(GLOBAL_KEY, OverrideRecord::rewrite(Method::Prefix, "x"));
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url.as_deref(), Some("new.microsite.local"));
        assert_eq!(resolution.url_tier, Some(Tier::Type));
    }

    #[test]
    fn fields_resolve_independently() {
        let settings = OverrideSettings::new()
            .with("5", OverrideRecord::default().with_https(true))
            .with(
                GLOBAL_KEY,
                OverrideRecord::rewrite(Method::Prefix, "new").with_https(false),
            );
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url.as_deref(), Some("new-one.microsite.local"));
        assert_eq!(resolution.url_tier, Some(Tier::Global));
        assert_eq!(resolution.https, Some(true));
        assert_eq!(resolution.https_tier, Some(Tier::Id));
    }

    #[test]
    fn scheme_only_record_reports_no_issue() {
        let settings =
            OverrideSettings::new().with(GLOBAL_KEY, OverrideRecord::default().with_https(true));
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url, None);
        assert_eq!(resolution.https, Some(true));
        assert!(resolution.issues.is_empty());
    }

    #[test]
    fn partial_rewrite_record_is_an_issue() {
        let settings = OverrideSettings::new().with(
            "generic",
            OverrideRecord {
                method: Some("prefix".into()),
                ..OverrideRecord::default()
            },
        );
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url, None);
        assert_eq!(resolution.issues.len(), 1);
        assert_eq!(resolution.issues[0].problem, OverrideProblem::MissingPattern);
        assert_eq!(
            resolution.issues[0].to_string(),
            "override_url['generic']: no pattern entry found"
        );
    }

    #[test]
    fn broken_tier_blocks_lower_url_rewrites() {
        let settings = OverrideSettings::new()
            .with(
                "generic",
                OverrideRecord {
                    method: Some("sufix".into()),
                    pattern: Some("x".into()),
                    ..OverrideRecord::default()
                },
            )
            .with(GLOBAL_KEY, OverrideRecord::rewrite(Method::Prefix, "g"));
        let resolution = settings.resolve(&site());
        assert!(resolution.is_empty());
        assert_eq!(resolution.url_tier, Some(Tier::Type));
        assert_eq!(resolution.issues.len(), 1);
        assert_eq!(
            resolution.issues[0].problem,
            OverrideProblem::InvalidMethod("sufix".into())
        );
        assert_eq!(
            resolution.issues[0].problem.to_string(),
            "method 'sufix' is not valid, method must be one of: prefix, subdomain, tld"
        );
    }

    #[test]
    fn broken_tier_still_takes_https_from_lower_tiers() {
        let settings = OverrideSettings::new()
            .with(
                "5",
                OverrideRecord {
                    pattern: Some("x".into()),
                    ..OverrideRecord::default()
                },
            )
            .with(
                GLOBAL_KEY,
                OverrideRecord::rewrite(Method::Prefix, "g").with_https(true),
            );
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url, None);
        assert_eq!(resolution.https, Some(true));
        assert_eq!(resolution.https_tier, Some(Tier::Global));
        assert_eq!(resolution.issues[0].problem, OverrideProblem::MissingMethod);
    }

    #[test]
    fn empty_direct_url_falls_through() {
        let settings = OverrideSettings::new()
            .with("5", OverrideRecord::direct(""))
            .with(GLOBAL_KEY, OverrideRecord::rewrite(Method::Tld, "org"));
        let resolution = settings.resolve(&site());
        assert_eq!(resolution.site_url.as_deref(), Some("one.microsite.org"));
    }

    #[test]
    fn deserializes_from_json_mapping() {
        let settings: OverrideSettings = serde_json::from_str(
            r#"{"global": {"method": "prefix", "pattern": "new", "https": true}}"#,
        )
        .unwrap();
        let record = settings.get(GLOBAL_KEY).unwrap();
        assert_eq!(record.method.as_deref(), Some("prefix"));
        assert_eq!(record.https, Some(true));
    }
}
