//! Middleware for logging requests and responses.

use axum::{
    body::Bytes,
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{AUTHORIZATION, CONTENT_TYPE},
        request, response,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// The number of characters of a request or response body to log at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Bearer tokens and any JSON field called `password` are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("could not read request body: {error}");
            return Error::InvalidPayload(error.to_string()).into_response();
        }
    };

    log_request(&parts, &body_bytes);

    let request = Request::from_parts(parts, body_bytes.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            return Error::ResponseBodyError(error.to_string()).into_response();
        }
    };

    log_response(&parts, &body_bytes);

    Response::from_parts(parts, body_bytes.into())
}

fn log_request(parts: &request::Parts, body: &Bytes) {
    let headers = redact_headers(&parts.headers);
    let body = body_text(&parts.headers, body);

    if body.chars().count() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nheaders: {headers:#?}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(&body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nheaders: {headers:#?}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &response::Parts, body: &Bytes) {
    let body = body_text(&parts.headers, body);

    if body.chars().count() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nheaders: {:#?}\nbody: {}...",
            parts.status,
            parts.headers,
            truncate(&body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!(
            "Sending response: {}\nheaders: {:#?}\nbody: {body:?}",
            parts.status,
            parts.headers
        );
    }
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

/// The body as text, with password fields redacted if the body is JSON.
fn body_text(headers: &HeaderMap, body: &Bytes) -> String {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    if is_json {
        if let Ok(mut json) = serde_json::from_slice::<Value>(body) {
            redact_password(&mut json);
            return json.to_string();
        }
    }

    String::from_utf8_lossy(body).to_string()
}

fn redact_password(json: &mut Value) {
    match json {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if key == "password" {
                    *value = Value::String(REDACTED.to_owned());
                } else {
                    redact_password(value);
                }
            }
        }
        Value::Array(values) => values.iter_mut().for_each(redact_password),
        _ => {}
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
