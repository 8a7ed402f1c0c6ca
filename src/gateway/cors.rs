//! CORS header construction.

use super::envelope::Headers;

/// Methods advertised to browsers.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Request headers browsers may send.
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// How long a preflight result may be cached, in seconds.
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Origin allow-list.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Vec<String>,
}

impl CorsPolicy {
    /// Create a policy from configured origins. An empty list allows any origin.
    pub fn new(origins: &[String]) -> Self {
        Self {
            origins: origins.to_vec(),
        }
    }

    /// Value for `Access-Control-Allow-Origin`.
    ///
    /// `*` when the list contains it, the request origin when listed,
    /// otherwise the first configured origin.
    pub fn allow_origin(&self, request_origin: Option<&str>) -> &str {
        if self.origins.is_empty() || self.origins.iter().any(|o| o == "*") {
            return "*";
        }

        request_origin
            .and_then(|origin| self.origins.iter().find(|o| o.as_str() == origin))
            .unwrap_or(&self.origins[0])
    }

    /// Add the headers sent on ordinary responses.
    pub fn apply(&self, headers: &mut Headers, request_origin: Option<&str>) {
        let origin = self.allow_origin(request_origin);
        if origin != "*" {
            headers.insert("Vary", "Origin");
        }
        headers.insert("Access-Control-Allow-Origin", origin);
        headers.insert("Access-Control-Allow-Methods", ALLOWED_METHODS);
        headers.insert("Access-Control-Allow-Headers", ALLOWED_HEADERS);
    }

    /// Headers for a preflight response.
    pub fn preflight_headers(&self, request_origin: Option<&str>) -> Headers {
        let mut headers = Headers::new();
        self.apply(&mut headers, request_origin);
        headers.insert("Access-Control-Max-Age", PREFLIGHT_MAX_AGE);
        headers
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new(&["*".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(origins: &[&str]) -> CorsPolicy {
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        CorsPolicy::new(&origins)
    }

    #[test]
    fn test_wildcard() {
        let cors = CorsPolicy::default();
        assert_eq!(cors.allow_origin(None), "*");
        assert_eq!(cors.allow_origin(Some("https://a.example")), "*");
    }

    #[test]
    fn test_empty_list_allows_any() {
        assert_eq!(policy(&[]).allow_origin(Some("https://a.example")), "*");
    }

    #[test]
    fn test_listed_origin_is_reflected() {
        let cors = policy(&["https://a.example", "https://b.example"]);
        assert_eq!(
            cors.allow_origin(Some("https://b.example")),
            "https://b.example"
        );
    }

    #[test]
    fn test_unlisted_origin_gets_first() {
        let cors = policy(&["https://a.example", "https://b.example"]);
        assert_eq!(
            cors.allow_origin(Some("https://evil.example")),
            "https://a.example"
        );
        assert_eq!(cors.allow_origin(None), "https://a.example");
    }

    #[test]
    fn test_apply_sets_vary_for_specific_origin() {
        let mut headers = Headers::new();
        policy(&["https://a.example"]).apply(&mut headers, Some("https://a.example"));
        assert_eq!(headers.get("vary"), Some("Origin"));

        let mut headers = Headers::new();
        CorsPolicy::default().apply(&mut headers, None);
        assert!(!headers.contains("vary"));
    }

    #[test]
    fn test_preflight_headers() {
        let headers = CorsPolicy::default().preflight_headers(None);

        assert_eq!(headers.get("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            headers.get("Access-Control-Allow-Methods"),
            Some("GET, POST, OPTIONS")
        );
        assert_eq!(
            headers.get("Access-Control-Allow-Headers"),
            Some("Content-Type, Authorization")
        );
        assert_eq!(headers.get("Access-Control-Max-Age"), Some("86400"));
    }
}
