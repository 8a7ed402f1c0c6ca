//! Request routing.

use crate::feed::DEFAULT_FEED;

/// A recognized request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight on any path.
    Preflight,
    /// Liveness and store-size diagnostics.
    Health,
    /// Serve a feed by identifier.
    Feed(String),
    /// Invalidate and refetch a feed named in the body.
    Refresh,
    /// Anything else.
    MethodNotAllowed,
}

impl Route {
    /// Route a request by method and path.
    ///
    /// The query string and an optional `/api` prefix are ignored, so
    /// `/api/feeds/top?x=1` and `/feeds/top` are the same route. An empty
    /// feed identifier means the top stories feed.
    pub fn parse(method: &str, path: &str) -> Self {
        // Method names are case-sensitive
        if method == "OPTIONS" {
            return Route::Preflight;
        }

        let path = path.split(['?', '#']).next().unwrap_or("");
        let path = match path.strip_prefix("/api") {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        };

        match (method, path) {
            ("GET", "/health") => Route::Health,
            ("POST", "/feeds/refresh") => Route::Refresh,
            ("GET", "/feeds") => Route::Feed(DEFAULT_FEED.to_string()),
            ("GET", p) => match p.strip_prefix("/feeds/") {
                Some(id) if !id.contains('/') => {
                    if id.is_empty() {
                        Route::Feed(DEFAULT_FEED.to_string())
                    } else {
                        Route::Feed(id.to_string())
                    }
                }
                _ => Route::MethodNotAllowed,
            },
            _ => Route::MethodNotAllowed,
        }
    }

    /// Whether requests on this route count against the client's quota.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Route::Feed(_) | Route::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_any_path() {
        assert_eq!(Route::parse("OPTIONS", "/api/feeds/top"), Route::Preflight);
        assert_eq!(Route::parse("OPTIONS", "/whatever"), Route::Preflight);
        assert_eq!(Route::parse("OPTIONS", ""), Route::Preflight);
    }

    #[test]
    fn test_health() {
        assert_eq!(Route::parse("GET", "/api/health"), Route::Health);
        assert_eq!(Route::parse("GET", "/health"), Route::Health);
        assert_eq!(Route::parse("POST", "/api/health"), Route::MethodNotAllowed);
    }

    #[test]
    fn test_feed_ids() {
        assert_eq!(
            Route::parse("GET", "/api/feeds/technology"),
            Route::Feed("technology".to_string())
        );
        assert_eq!(
            Route::parse("GET", "/feeds/sports"),
            Route::Feed("sports".to_string())
        );
        assert_eq!(
            Route::parse("GET", "/api/feeds/Top"),
            Route::Feed("Top".to_string())
        );
    }

    #[test]
    fn test_empty_feed_id_is_top() {
        assert_eq!(Route::parse("GET", "/api/feeds/"), Route::Feed("top".to_string()));
        assert_eq!(Route::parse("GET", "/api/feeds"), Route::Feed("top".to_string()));
    }

    #[test]
    fn test_query_string_ignored() {
        assert_eq!(
            Route::parse("GET", "/api/feeds/health?lang=en"),
            Route::Feed("health".to_string())
        );
        assert_eq!(
            Route::parse("POST", "/api/feeds/refresh?force=1"),
            Route::Refresh
        );
    }

    #[test]
    fn test_refresh() {
        assert_eq!(Route::parse("POST", "/api/feeds/refresh"), Route::Refresh);
        assert_eq!(Route::parse("POST", "/api/feeds/top"), Route::MethodNotAllowed);
    }

    #[test]
    fn test_other_methods_not_allowed() {
        for method in ["DELETE", "PUT", "PATCH", "HEAD"] {
            assert_eq!(
                Route::parse(method, "/api/feeds/top"),
                Route::MethodNotAllowed
            );
        }
    }

    #[test]
    fn test_methods_are_case_sensitive() {
        assert_eq!(Route::parse("get", "/api/feeds/top"), Route::MethodNotAllowed);
        assert_eq!(Route::parse("Get", "/api/health"), Route::MethodNotAllowed);
        assert_eq!(Route::parse("post", "/api/feeds/refresh"), Route::MethodNotAllowed);
        assert_eq!(Route::parse("options", "/api/feeds/top"), Route::MethodNotAllowed);
    }

    #[test]
    fn test_unknown_paths_not_allowed() {
        assert_eq!(Route::parse("GET", "/"), Route::MethodNotAllowed);
        assert_eq!(Route::parse("GET", "/api"), Route::MethodNotAllowed);
        assert_eq!(Route::parse("GET", "/api/feeds/a/b"), Route::MethodNotAllowed);
        assert_eq!(Route::parse("GET", "/apifeeds/top"), Route::MethodNotAllowed);
    }

    #[test]
    fn test_rate_limited_routes() {
        assert!(Route::Feed("top".to_string()).is_rate_limited());
        assert!(Route::Refresh.is_rate_limited());
        assert!(!Route::Preflight.is_rate_limited());
        assert!(!Route::Health.is_rate_limited());
        assert!(!Route::MethodNotAllowed.is_rate_limited());
    }
}
