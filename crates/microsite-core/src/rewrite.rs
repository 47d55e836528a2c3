// ── URL rewrite engine ──
//
// Derives a new hostname from an old one, a pattern, and a method.
// Pure string manipulation over dot-separated labels; no validation of
// the characters in `pattern`.

use serde::Serialize;
use strum::{Display, EnumString, VariantNames};
use thiserror::Error;

/// Which part of the hostname the pattern replaces.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    VariantNames,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// `pattern-old.host`
    Prefix,
    /// Replace the left-most of the last three labels.
    Subdomain,
    /// Replace the top-level domain.
    Tld,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("pattern is empty")]
    EmptyPattern,

    #[error("site URL is empty")]
    EmptyHost,
}

/// Rewrite `old_url` with `pattern` according to `method`.
///
/// `subdomain` splits into at most three labels from the left and replaces
/// the first one, so `a.b.c.d` becomes `x.b.c.d`. Hosts with fewer than
/// three labels get the pattern prepended instead: `b.com` becomes
/// `x.b.com`.
pub fn rewrite(old_url: &str, pattern: &str, method: Method) -> Result<String, RewriteError> {
    if pattern.is_empty() {
        return Err(RewriteError::EmptyPattern);
    }
    if old_url.is_empty() {
        return Err(RewriteError::EmptyHost);
    }

    let new_url = match method {
        Method::Prefix => format!("{pattern}-{old_url}"),
        Method::Subdomain => {
            let labels: Vec<&str> = old_url.splitn(3, '.').collect();
            if labels.len() < 3 {
                format!("{pattern}.{old_url}")
            } else {
                std::iter::once(pattern)
                    .chain(labels.into_iter().skip(1))
                    .collect::<Vec<_>>()
                    .join(".")
            }
        }
        Method::Tld => match old_url.rsplit_once('.') {
            Some((rest, _tld)) => format!("{rest}.{pattern}"),
            None => pattern.to_owned(),
        },
    };
    Ok(new_url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefix_prepends_with_dash() {
        assert_eq!(rewrite("a.b.com", "x", Method::Prefix).unwrap(), "x-a.b.com");
    }

    #[test]
    fn subdomain_replaces_third_label_from_end() {
        assert_eq!(
            rewrite("one.microsite.local", "new", Method::Subdomain).unwrap(),
            "new.microsite.local"
        );
    }

    #[test]
    fn subdomain_on_long_host_replaces_leftmost_label() {
        assert_eq!(
            rewrite("a.b.c.d", "x", Method::Subdomain).unwrap(),
            "x.b.c.d"
        );
    }

    #[test]
    fn subdomain_on_short_host_prepends() {
        assert_eq!(rewrite("b.com", "x", Method::Subdomain).unwrap(), "x.b.com");
        assert_eq!(
            rewrite("localhost", "x", Method::Subdomain).unwrap(),
            "x.localhost"
        );
    }

    #[test]
    fn tld_replaces_last_label() {
        assert_eq!(
            rewrite("one.microsite.local", "org", Method::Tld).unwrap(),
            "one.microsite.org"
        );
        assert_eq!(rewrite("a.b.c.d.local", "io", Method::Tld).unwrap(), "a.b.c.d.io");
    }

    #[test]
    fn tld_on_single_label_replaces_everything() {
        assert_eq!(rewrite("localhost", "org", Method::Tld).unwrap(), "org");
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert_eq!(
            rewrite("a.local", "", Method::Prefix),
            Err(RewriteError::EmptyPattern)
        );
        assert_eq!(rewrite("", "x", Method::Tld), Err(RewriteError::EmptyHost));
    }

    #[test]
    fn method_parses_lowercase_names_only() {
        assert_eq!("prefix".parse::<Method>().unwrap(), Method::Prefix);
        assert_eq!("tld".parse::<Method>().unwrap(), Method::Tld);
        assert!("Prefix".parse::<Method>().is_err());
        assert!("suffix".parse::<Method>().is_err());
        assert_eq!(Method::Subdomain.to_string(), "subdomain");
    }
}
