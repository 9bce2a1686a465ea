use utoipa::OpenApi;
use utoipa::ToSchema;

use models::{FieldError, Item, ItemInput};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Body returned by every failing request.
#[derive(ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Not Found")]
    pub error: String,
    pub message: Option<String>,
    pub detail: Option<Vec<FieldError>>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Item Store API",
        description = "Simple RESTful CRUD API over an in-memory collection of items.",
        version = "1.0.0"
    ),
    paths(
        crate::routes::health,
        crate::routes::items::create_item,
        crate::routes::items::list_items,
        crate::routes::items::get_item,
        crate::routes::items::update_item,
        crate::routes::items::delete_item,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            FieldError,
            Item,
            ItemInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "items", description = "Item CRUD")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_item_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/items/"));
        assert!(paths.contains_key("/items/{id}"));
        assert!(paths.contains_key("/health"));
        let by_id = &paths["/items/{id}"];
        for method in ["get", "put", "delete"] {
            assert!(by_id.get(method).is_some(), "missing {method}");
        }
        assert!(doc["components"]["schemas"].get("Item").is_some());
    }
}
