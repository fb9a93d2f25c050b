//! Session cookie middleware

use axum::{
    body::Body,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Request,
    },
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;

use crate::domain::entities::SessionId;

pub const SESSION_COOKIE: &str = "billetterie_session";

const SESSION_ID_BYTES: usize = 32;

/// Generate an unguessable session id
pub fn new_session_id() -> SessionId {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    SessionId(URL_SAFE_NO_PAD.encode(bytes))
}

/// Whether a cookie value looks like an id we issued
fn is_well_formed(value: &str) -> bool {
    URL_SAFE_NO_PAD
        .decode(value)
        .map(|bytes| bytes.len() == SESSION_ID_BYTES)
        .unwrap_or(false)
}

/// Extract the session id from the Cookie headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| is_well_formed(value))
        .map(|value| SessionId(value.to_string()))
}

fn session_cookie(id: &SessionId) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id.0
    )
}

/// Session middleware
///
/// Injects the visitor's `SessionId` into request extensions and sets the
/// cookie on the response when the session is new.
pub async fn session_middleware(mut request: Request<Body>, next: Next) -> Response {
    let (session_id, is_new) = match session_id_from_headers(request.headers()) {
        Some(id) => (id, false),
        None => (new_session_id(), true),
    };

    request.extensions_mut().insert(session_id.clone());

    let mut response = next.run(request).await;

    if is_new {
        match HeaderValue::from_str(&session_cookie(&session_id)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to build session cookie"),
        }
    }

    response
}
