use axum::{extract::{Path, State}, http::StatusCode, Json};
use tracing::{info, warn};

use models::Item;
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::extract::ItemPayload;
use crate::metrics;
use crate::routes::ServerState;

fn api_error(op: &str, id: &str, e: ServiceError) -> JsonApiError {
    if matches!(e, ServiceError::NotFound(_)) {
        metrics::NOT_FOUND_TOTAL.inc();
        warn!(op, id, "item not found");
    }
    e.into()
}

#[utoipa::path(
    post, path = "/items/", tag = "items",
    request_body = models::ItemInput,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 415, description = "Body is not JSON", body = crate::openapi::ErrorResponse),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<ServerState>,
    ItemPayload(input): ItemPayload,
) -> Result<(StatusCode, Json<Item>), JsonApiError> {
    metrics::record_op("create");
    let item = state.items.create(input).await?;
    metrics::ITEMS.inc();
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get, path = "/items/", tag = "items",
    responses((status = 200, description = "All stored items, unordered", body = [Item]))
)]
pub async fn list_items(State(state): State<ServerState>) -> Json<Vec<Item>> {
    metrics::record_op("list");
    let items = state.items.list().await;
    info!(count = items.len(), "list items");
    Json(items)
}

#[utoipa::path(
    get, path = "/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "OK", body = Item),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, JsonApiError> {
    metrics::record_op("get");
    state.items.get(&id).await.map(Json).map_err(|e| api_error("get", &id, e))
}

/// Replace an existing item.
///
/// Every field except the id is overwritten. Optional fields left out of the
/// body become null; this is a full replace, not a merge.
#[utoipa::path(
    put, path = "/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    request_body = models::ItemInput,
    responses(
        (status = 200, description = "Updated", body = Item),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ItemPayload(input): ItemPayload,
) -> Result<Json<Item>, JsonApiError> {
    metrics::record_op("update");
    state.items.update(&id, input).await.map(Json).map_err(|e| api_error("update", &id, e))
}

#[utoipa::path(
    delete, path = "/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Deleted, empty body"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    metrics::record_op("delete");
    state.items.delete(&id).await.map_err(|e| api_error("delete", &id, e))?;
    metrics::ITEMS.dec();
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::Service;

    use crate::metrics;

    async fn create(mut app: axum::Router, n: usize) -> anyhow::Result<String> {
        let req = Request::builder()
            .method("POST")
            .uri("/items/")
            .body(Body::from(format!("{{\"name\": \"item-{n}\", \"price\": 1}}")))?;
        let resp = app.call(req).await?;
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let item: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(item["id"].as_str().unwrap_or_default().to_string())
    }

    // only test in this binary that touches the items gauge
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn items_gauge_follows_concurrent_writes() -> anyhow::Result<()> {
        let app = crate::build_app();
        let before = metrics::ITEMS.get();

        let handles: Vec<_> = (0..16).map(|n| tokio::spawn(create(app.clone(), n))).collect();
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await??);
        }
        assert_eq!(metrics::ITEMS.get(), before + 16);

        let handles: Vec<_> = ids
            .iter()
            .take(6)
            .map(|id| {
                let mut app = app.clone();
                let req = Request::builder().method("DELETE").uri(format!("/items/{id}")).body(Body::empty());
                tokio::spawn(async move { anyhow::Ok(app.call(req?).await?.status()) })
            })
            .collect();
        for h in handles {
            assert_eq!(h.await??, axum::http::StatusCode::NO_CONTENT);
        }
        assert_eq!(metrics::ITEMS.get(), before + 10);
        Ok(())
    }
}
