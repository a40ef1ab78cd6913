use serde::Serialize;

/// Top-level view selected by the URL fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Public,
    Admin,
}

impl Route {
    /// Admin only on an exact match of the configured fragment (e.g. `#admin`).
    pub fn resolve(fragment: &str, admin_fragment: &str) -> Self {
        if fragment == admin_fragment {
            Route::Admin
        } else {
            Route::Public
        }
    }

    /// Resolves from a full URL string, such as a `Referer` or the browser location.
    pub fn from_url(raw: &str, admin_fragment: &str) -> Self {
        match url::Url::parse(raw) {
            Ok(parsed) => {
                let fragment = parsed.fragment().map(|f| format!("#{f}")).unwrap_or_default();
                Route::resolve(&fragment, admin_fragment)
            }
            Err(_) => Route::Public,
        }
    }
}
