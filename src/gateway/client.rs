//! Client identification for rate limiting.

use super::envelope::Headers;

/// Header the transport adapter uses to pass the peer address.
pub const REMOTE_ADDR_HEADER: &str = "Remote-Addr";

/// Identifier used when no address information is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Identify the client behind a request.
///
/// Tries the first hop of `X-Forwarded-For`, then `X-Real-IP`, then the
/// peer address, and finally falls back to `"unknown"`.
pub fn client_id(headers: &Headers) -> String {
    // Take the first IP in the chain
    if let Some(ip) = non_blank(
        headers
            .get("X-Forwarded-For")
            .and_then(|v| v.split(',').next()),
    ) {
        return ip.to_string();
    }

    // Try X-Real-IP header
    if let Some(ip) = non_blank(headers.get("X-Real-IP")) {
        return ip.to_string();
    }

    // Fall back to connection info
    if let Some(ip) = non_blank(headers.get(REMOTE_ADDR_HEADER)) {
        return ip.to_string();
    }

    UNKNOWN_CLIENT.to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_for_first_hop() {
        let headers = Headers::new()
            .with("X-Forwarded-For", "203.0.113.7, 10.0.0.1")
            .with("X-Real-IP", "10.0.0.2");
        assert_eq!(client_id(&headers), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let headers = Headers::new()
            .with("x-real-ip", "198.51.100.4")
            .with("Remote-Addr", "127.0.0.1");
        assert_eq!(client_id(&headers), "198.51.100.4");
    }

    #[test]
    fn test_remote_addr_fallback() {
        let headers = Headers::new().with("remote-addr", "127.0.0.1");
        assert_eq!(client_id(&headers), "127.0.0.1");
    }

    #[test]
    fn test_empty_forwarded_falls_through() {
        let headers = Headers::new()
            .with("X-Forwarded-For", " ")
            .with("Remote-Addr", "127.0.0.1");
        assert_eq!(client_id(&headers), "127.0.0.1");
    }

    #[test]
    fn test_unknown() {
        assert_eq!(client_id(&Headers::new()), "unknown");
    }
}
