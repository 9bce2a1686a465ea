use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use models::ItemInput;
use serde_json::Value;
use service::items::ItemService;

use crate::errors::JsonApiError;
use crate::metrics;

/// Request body checked against the item schema.
///
/// The body is parsed as JSON whatever the `Content-Type` header says, then
/// each field is checked by `ItemInput::from_json`. Malformed JSON and schema
/// failures are both rejected with 422 and field-level detail; a body over
/// the size limit keeps its 413.
#[derive(Debug)]
pub struct ItemPayload(pub ItemInput);

#[async_trait]
impl<S> FromRequest<S> for ItemPayload
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| rejected(e.into()))?;
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| rejected(e.into()))?;
        let input = ItemService::parse_input(&body).map_err(|e| rejected(e.into()))?;
        Ok(Self(input))
    }
}

fn rejected(err: JsonApiError) -> JsonApiError {
    if err.status == StatusCode::UNPROCESSABLE_ENTITY {
        metrics::VALIDATION_FAILURES_TOTAL.inc();
    }
    err
}
