//! Transport-agnostic request and response envelopes.

use serde::Serialize;

/// Header list with case-insensitive names.
///
/// Insertion order is preserved; inserting an existing name replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a header value by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Whether a header is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

/// An incoming request.
#[derive(Debug, Clone, Default)]
pub struct RequestEnvelope {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Request path, possibly with a query string.
    pub path: String,
    /// Request headers.
    pub headers: Headers,
    /// Raw body, if any.
    pub body: Option<String>,
}

impl RequestEnvelope {
    /// Create a request without headers or body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// An outgoing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Headers,
    /// Serialized body, if any.
    pub body: Option<String>,
}

impl ResponseEnvelope {
    /// Create a response with no body.
    pub fn empty(status: u16, headers: Headers) -> Self {
        Self {
            status,
            headers,
            body: None,
        }
    }

    /// Create a JSON response, setting `Content-Type`.
    pub fn json<T: Serialize>(status: u16, mut headers: Headers, body: &T) -> Self {
        headers.insert("Content-Type", "application/json");
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize response body");
            r#"{"error":"Internal server error","message":"An unexpected error occurred"}"#
                .to_string()
        });
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// Parse the body as JSON.
    pub fn json_value(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_case_insensitive() {
        let headers = Headers::new().with("X-Forwarded-For", "1.2.3.4");

        assert_eq!(headers.get("x-forwarded-for"), Some("1.2.3.4"));
        assert_eq!(headers.get("X-FORWARDED-FOR"), Some("1.2.3.4"));
        assert!(headers.contains("x-forwarded-for"));
        assert!(headers.get("x-real-ip").is_none());
    }

    #[test]
    fn test_headers_insert_replaces() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("content-type", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_headers_preserve_order() {
        let headers: Headers = [("B", "2"), ("A", "1")].into_iter().collect();
        let names: Vec<_> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_request_builder() {
        let req = RequestEnvelope::new("POST", "/api/feeds/refresh")
            .with_header("Origin", "https://example.com")
            .with_body(r#"{"feedType":"sports"}"#);

        assert_eq!(req.method, "POST");
        assert_eq!(req.headers.get("origin"), Some("https://example.com"));
        assert_eq!(req.body.as_deref(), Some(r#"{"feedType":"sports"}"#));
    }

    #[test]
    fn test_json_response() {
        let resp = ResponseEnvelope::json(200, Headers::new(), &json!({"ok": true}));

        assert_eq!(resp.status, 200);
        assert_eq!(resp.headers.get("content-type"), Some("application/json"));
        assert_eq!(resp.json_value(), Some(json!({"ok": true})));
    }

    #[test]
    fn test_empty_response() {
        let resp = ResponseEnvelope::empty(200, Headers::new());
        assert!(resp.body.is_none());
        assert!(resp.json_value().is_none());
    }
}
