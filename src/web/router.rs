//! Router configuration for the HTTP adapter.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::convert::request_envelope;
use crate::gateway::Gateway;

/// Create the router.
///
/// Every request goes to the gateway, which does its own routing.
pub fn create_router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(gateway)
}

async fn dispatch(
    State(gateway): State<Arc<Gateway>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let envelope = request_envelope(&method, &uri, &headers, &body, peer);

    gateway.dispatch(envelope).await.into_response()
}
