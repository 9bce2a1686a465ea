use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::FieldError;
use service::errors::ServiceError;
use thiserror::Error;

/// JSON error body shared by every endpoint:
/// `{"error": "...", "message": "...", "detail": [{"field", "message"}]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
    pub detail: Option<Vec<FieldError>>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message, detail: None }
    }

    pub fn validation(message: String, detail: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: "Validation Error",
            message: Some(message),
            detail: Some(detail),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({"error": self.error});
        if let Some(msg) = self.message {
            body["message"] = serde_json::Value::String(msg);
        }
        if let Some(detail) = self.detail {
            body["detail"] = serde_json::json!(detail);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Model(ref m) => {
                let detail = m.fields().to_vec();
                JsonApiError::validation(e.to_string(), detail)
            }
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
        }
    }
}

impl From<BytesRejection> for JsonApiError {
    fn from(rejection: BytesRejection) -> Self {
        let status = rejection.status();
        let msg = rejection.body_text();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return JsonApiError::new(status, "Payload Too Large", Some(msg));
        }
        JsonApiError::validation(msg.clone(), vec![FieldError::new("body", msg)])
    }
}

impl From<serde_json::Error> for JsonApiError {
    fn from(e: serde_json::Error) -> Self {
        let msg = format!("invalid JSON body: {e}");
        JsonApiError::validation(msg.clone(), vec![FieldError::new("body", msg)])
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::ModelError;

    #[test]
    fn not_found_maps_to_404() {
        let err: JsonApiError = ServiceError::not_found("item", "abc").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message.as_deref(), Some("item abc not found"));
    }

    #[test]
    fn model_errors_carry_field_detail() {
        let err: JsonApiError = ServiceError::from(ModelError::field("price", "field required")).into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail, Some(vec![FieldError::new("price", "field required")]));
    }

    #[test]
    fn json_syntax_errors_are_unprocessable() {
        let e = serde_json::from_slice::<serde_json::Value>(b"{\"name\": ").unwrap_err();
        let err: JsonApiError = e.into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail.map(|d| d[0].field.clone()).as_deref(), Some("body"));
    }
}
