//! Endpoint rules: where each operation is sent, and when the proxy may be
//! tried instead.

/// Server URLs for which a failed direct connection is retried through the
/// local `/api` proxy. Compared verbatim, no normalisation.
pub const LOOPBACK_SERVER_URLS: [&str; 2] = ["http://127.0.0.1:8080", "http://localhost:8080"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Execute,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Execute => "execute",
        }
    }

    /// Path on the local proxy.
    pub fn proxy_path(self) -> &'static str {
        match self {
            Self::Login => "/api/login",
            Self::Execute => "/api/execute",
        }
    }
}

/// `server_url` + operation, with exactly one `/` between them when the URL
/// does not already end in one.
pub fn primary_url(server_url: &str, operation: Operation) -> String {
    if server_url.ends_with('/') {
        format!("{}{}", server_url, operation.as_str())
    } else {
        format!("{}/{}", server_url, operation.as_str())
    }
}

/// Whether a transport failure against `server_url` may be retried via the proxy.
pub fn is_fallback_eligible(server_url: &str) -> bool {
    LOOPBACK_SERVER_URLS.contains(&server_url)
}

/// Proxy URL for `operation` on `proxy_origin`.
pub fn fallback_url(proxy_origin: &str, operation: Operation) -> String {
    format!(
        "{}{}",
        proxy_origin.trim_end_matches('/'),
        operation.proxy_path()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_url_normalises_single_trailing_slash() {
        assert_eq!(
            primary_url("http://127.0.0.1:8080", Operation::Login),
            "http://127.0.0.1:8080/login"
        );
        assert_eq!(
            primary_url("http://127.0.0.1:8080/", Operation::Execute),
            "http://127.0.0.1:8080/execute"
        );
        assert_eq!(
            primary_url("https://example.com/kasane", Operation::Execute),
            "https://example.com/kasane/execute"
        );
    }

    #[test]
    fn test_fallback_only_for_well_known_loopback_forms() {
        assert!(is_fallback_eligible("http://127.0.0.1:8080"));
        assert!(is_fallback_eligible("http://localhost:8080"));
        assert!(!is_fallback_eligible("http://127.0.0.1:8080/"));
        assert!(!is_fallback_eligible("http://localhost:9090"));
        assert!(!is_fallback_eligible("https://example.com"));
    }

    #[test]
    fn test_fallback_url() {
        assert_eq!(
            fallback_url("http://localhost:5173", Operation::Login),
            "http://localhost:5173/api/login"
        );
        assert_eq!(
            fallback_url("http://localhost:5173/", Operation::Execute),
            "http://localhost:5173/api/execute"
        );
    }
}
