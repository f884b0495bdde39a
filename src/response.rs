//! JSON envelopes shared by the REST handlers.

use axum::{Json, extract::rejection::JsonRejection};
use serde::Serialize;

use crate::Error;

/// A single resource, serialized as `{ "item": ... }`.
#[derive(Debug, Serialize)]
pub struct ItemResponse<T> {
    /// The resource.
    pub item: T,
}

/// A list of resources, serialized as `{ "items": [...] }`.
#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
    /// The resources.
    pub items: Vec<T>,
}

/// Acknowledges a request that returns no resource, serialized as `{ "ok": true }`.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    /// Always true.
    pub ok: bool,
}

impl OkResponse {
    /// An acknowledgement.
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Unwrap a JSON request body, converting an extractor rejection into [Error::InvalidPayload].
pub fn parse_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Error::InvalidPayload(rejection.body_text()))
}
