//! Query parameters of the redirect endpoint.

use serde::Deserialize;

/// `GET /redirect?target=<url>&new_domain=<host>`.
///
/// `lpurl` is accepted as an alias of `target` for tracking templates
/// created before the rename.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectQuery {
    pub target: Option<String>,
    pub lpurl: Option<String>,
    pub new_domain: Option<String>,
}

impl RedirectQuery {
    /// The requested target, `target` winning over `lpurl`. Blank values count as absent.
    pub fn target(&self) -> Option<&str> {
        non_blank(self.target.as_deref()).or_else(|| non_blank(self.lpurl.as_deref()))
    }

    pub fn new_domain(&self) -> Option<&str> {
        non_blank(self.new_domain.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
