//! Resolves the `Location` of a tracking redirect.

use url::Url;

/// Computes where a redirect request should land.
///
/// With `new_domain`, the host of `target` is swapped for it while scheme,
/// path and query are kept. Fragments and credentials are dropped. A target
/// that is not an absolute URL is appended as a path: `https://<new_domain>/<target>`.
///
/// Without `new_domain`, `target` is returned as is, prefixed with `https://`
/// when it does not already start with `http`.
pub fn resolve_redirect(target: &str, new_domain: Option<&str>) -> String {
    match new_domain {
        Some(domain) => match Url::parse(target) {
            Ok(url) => {
                let query = url.query().map(|q| format!("?{q}")).unwrap_or_default();
                format!("{}://{}{}{}", url.scheme(), domain, url.path(), query)
            }
            Err(_) => format!("https://{domain}/{target}"),
        },
        None if target.starts_with("http") => target.to_string(),
        None => format!("https://{target}"),
    }
}
