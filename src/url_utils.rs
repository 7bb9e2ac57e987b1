//! URL Utility Functions
//!
//! Resolution of link and image URLs against the document's base URL.

use url::Url;

/// Schemes that are kept exactly as written.
const OPAQUE_SCHEMES: [&str; 4] = ["data:", "javascript:", "mailto:", "tel:"];

/// Parse a string as an absolute http(s) URL with a host.
#[must_use]
pub fn parse_absolute_url(s: &str) -> Option<Url> {
    let s = s.trim();
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return None;
    }
    Url::parse(s).ok().filter(|url| url.host().is_some())
}

/// Convert a relative or absolute URL to absolute form.
///
/// Fragment-only links, `data:`, `javascript:`, `mailto:` and `tel:` URLs
/// are returned unchanged, as is anything the base cannot resolve.
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() || url_str.starts_with('#') {
        return url_str.to_string();
    }

    let lower = url_str.to_ascii_lowercase();
    if OPAQUE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return url_str.to_string();
    }

    if parse_absolute_url(url_str).is_some() {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Resolve every URL in a `srcset` attribute, keeping width/density descriptors.
#[must_use]
pub fn resolve_srcset(srcset: &str, base: &Url) -> String {
    srcset
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .map(|candidate| {
            let mut parts = candidate.splitn(2, char::is_whitespace);
            let url = create_absolute_url(parts.next().unwrap_or_default(), base);
            match parts.next().map(str::trim) {
                Some(descriptor) if !descriptor.is_empty() => format!("{url} {descriptor}"),
                _ => url,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether a link runs script instead of navigating.
#[must_use]
pub fn is_javascript_url(url_str: &str) -> bool {
    url_str
        .trim_start()
        .get(..11)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:"))
}
