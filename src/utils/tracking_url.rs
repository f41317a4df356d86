//! Builds the tracking URL template pushed to ad campaigns.

/// Builds `<redirect_base>?target=<enc(affiliate_target)>&new_domain=<enc(domain)>`.
///
/// Both values are percent-encoded the way `encodeURIComponent` does, so the
/// redirect endpoint gets them back verbatim after query decoding. When the
/// base already carries a query string the parameters are appended with `&`.
///
/// # Examples
///
/// ```
/// use adlink_rotator::utils::tracking_url::build_tracking_url;
///
/// let url = build_tracking_url(
///     "https://r.example.com/redirect",
///     "https://aff.example.com/offer?id=1",
///     "lp1.example.com",
/// );
/// assert_eq!(
///     url,
///     "https://r.example.com/redirect?target=https%3A%2F%2Faff.example.com%2Foffer%3Fid%3D1&new_domain=lp1.example.com"
/// );
/// ```
pub fn build_tracking_url(redirect_base: &str, affiliate_target: &str, domain: &str) -> String {
    let separator = if redirect_base.contains('?') { '&' } else { '?' };

    format!(
        "{redirect_base}{separator}target={}&new_domain={}",
        urlencoding::encode(affiliate_target),
        urlencoding::encode(domain)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn query_param(url: &str, name: &str) -> Option<String> {
        Url::parse(url)
            .ok()?
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build_tracking_url("https://r.example.com/redirect", "https://aff.com/x", "d.com");
        let b = build_tracking_url("https://r.example.com/redirect", "https://aff.com/x", "d.com");
        assert_eq!(a, b);
    }

    #[test]
    fn test_parameters_decode_to_inputs() {
        let target = "https://aff.example.com/path?x=1&y=a b&z=é";
        let url = build_tracking_url("https://r.example.com/redirect", target, "lp.example.com");

        assert_eq!(query_param(&url, "target").as_deref(), Some(target));
        assert_eq!(
            query_param(&url, "new_domain").as_deref(),
            Some("lp.example.com")
        );
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let url = build_tracking_url("https://r.example.com/redirect", "a&b=c#d", "x.com");
        assert!(url.ends_with("target=a%26b%3Dc%23d&new_domain=x.com"));
    }

    #[test]
    fn test_base_with_existing_query_uses_ampersand() {
        let url = build_tracking_url("https://r.example.com/redirect?src=ads", "t.com", "d.com");
        assert_eq!(
            url,
            "https://r.example.com/redirect?src=ads&target=t.com&new_domain=d.com"
        );
        assert_eq!(query_param(&url, "src").as_deref(), Some("ads"));
    }

    #[test]
    fn test_empty_target_still_builds() {
        let url = build_tracking_url("http://localhost:3000/redirect", "", "d.com");
        assert_eq!(url, "http://localhost:3000/redirect?target=&new_domain=d.com");
    }
}
