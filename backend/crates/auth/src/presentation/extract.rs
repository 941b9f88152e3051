//! Request extractors

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use platform::client::ClientFingerprint;
use std::net::SocketAddr;

use crate::error::AuthError;

/// Fingerprint of the calling client. The socket address is optional so
/// routers also work when served without `into_make_service_with_connect_info`.
pub struct Client(pub ClientFingerprint);

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Client(fingerprint_from_parts(parts)?))
    }
}

pub(crate) fn fingerprint_from_parts(parts: &Parts) -> Result<ClientFingerprint, AuthError> {
    let direct_ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    Ok(ClientFingerprint::from_headers(&parts.headers, direct_ip)?)
}
