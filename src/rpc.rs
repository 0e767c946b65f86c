//! Unary RPC request decoding.
//!
//! Calls arrive as `POST /healthlog.v1.<Service>/<Method>` with a JSON
//! message body. Only the JSON codec is served; binary payloads get a 415
//! that advertises the supported type.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::RpcError;

pub const PACKAGE: &str = "healthlog.v1";
pub const PROTOCOL_VERSION_HEADER: &str = "connect-protocol-version";

/// Builds the route path for a service method.
pub fn method_path(service: &str, method: &str) -> String {
    format!("/{PACKAGE}.{service}/{method}")
}

/// A decoded request message.
#[derive(Debug)]
pub struct Rpc<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Rpc<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        check_content_type(req.headers())?;
        check_protocol_version(req.headers()).map_err(IntoResponse::into_response)?;

        let body = Bytes::from_request(req, state).await.map_err(|e| {
            RpcError::invalid_argument(format!("unreadable request body: {e}")).into_response()
        })?;
        let raw: &[u8] = if body.is_empty() { b"{}" } else { &body };

        serde_json::from_slice(raw).map(Rpc).map_err(|e| {
            debug!(error = %e, "request message rejected");
            RpcError::invalid_argument(format!("invalid request message: {e}")).into_response()
        })
    }
}

fn check_content_type(headers: &HeaderMap) -> Result<(), Response> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Ok(());
    };
    let mime = value
        .to_str()
        .unwrap_or_default()
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if mime == "application/json" {
        return Ok(());
    }
    debug!(content_type = %mime, "unsupported codec");
    Err((
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        [("accept-post", "application/json")],
    )
        .into_response())
}

fn check_protocol_version(headers: &HeaderMap) -> Result<(), RpcError> {
    match headers.get(PROTOCOL_VERSION_HEADER) {
        None => Ok(()),
        Some(v) if v.as_bytes() == b"1" => Ok(()),
        Some(v) => Err(RpcError::invalid_argument(format!(
            "unsupported connect-protocol-version {:?}",
            v.to_str().unwrap_or("<binary>")
        ))),
    }
}
