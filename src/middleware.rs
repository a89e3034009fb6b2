use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::server::AppState;
use crate::session::SessionId;

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response.headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %uri,
        status = status,
        length = content_length,
        "HTTP request"
    );

    response
}

/// Attaches a live `SessionId` to every request, opening a new session
/// (and issuing its cookie) when the client has none or its old one expired.
pub async fn session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie.as_str();

    let mut existing = extract_session_cookie(&req, cookie_name);
    if let Some(ref id) = existing {
        if !state.sessions.touch(id).await {
            existing = None;
        }
    }

    let (session, issued) = match existing {
        Some(id) => (id, false),
        None => (state.sessions.create().await, true),
    };

    req.extensions_mut().insert(session.clone());
    let mut response = next.run(req).await;

    if issued {
        let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, session);
        if state.config.listen.tls_files().is_some() {
            cookie.push_str("; Secure");
        }
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Cannot encode session cookie: {}", e),
        }
    }

    response
}

fn extract_session_cookie<B>(req: &axum::http::Request<B>, name: &str) -> Option<SessionId> {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find_map(|cookies| parse_cookie(cookies, name))
        .map(|value| SessionId::from(value.as_str()))
}

fn parse_cookie(cookies: &str, name: &str) -> Option<String> {
    for part in cookies.split(';') {
        if let Some((key, value)) = part.trim().split_once('=') {
            if key.trim() == name {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}
