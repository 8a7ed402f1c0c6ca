//! Conversion between HTTP messages and gateway envelopes.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::gateway::{Headers, RequestEnvelope, ResponseEnvelope, REMOTE_ADDR_HEADER};

/// Build a request envelope from the parts of an HTTP request.
///
/// The peer address, when known, is passed as the `Remote-Addr` header. A
/// `Remote-Addr` header sent by the client is dropped.
pub fn request_envelope(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &Bytes,
    peer: Option<SocketAddr>,
) -> RequestEnvelope {
    let mut envelope_headers: Headers = headers
        .iter()
        .filter(|(name, _)| !name.as_str().eq_ignore_ascii_case(REMOTE_ADDR_HEADER))
        .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
        .collect();

    if let Some(addr) = peer {
        envelope_headers.insert(REMOTE_ADDR_HEADER, addr.ip().to_string());
    }

    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    RequestEnvelope {
        method: method.as_str().to_string(),
        path: path.to_string(),
        headers: envelope_headers,
        body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = match self.body {
            Some(body) => body.into_response(),
            None => ().into_response(),
        };
        *response.status_mut() = status;

        for (name, value) in self.headers.iter() {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}
