use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter, IntCounterVec, IntGauge, TextEncoder};

// Prometheus metrics (default registry)
pub static OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "item_store_operations_total",
        "Item operations handled, by operation",
        &["op"]
    )
    .expect("register operations_total")
});

pub static NOT_FOUND_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "item_store_not_found_total",
        "Item lookups that referenced an unknown id"
    )
    .expect("register not_found_total")
});

pub static VALIDATION_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "item_store_validation_failures_total",
        "Request bodies rejected by schema validation"
    )
    .expect("register validation_failures_total")
});

pub static ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("item_store_items", "Items currently stored")
        .expect("register items")
});

pub fn record_op(op: &str) {
    OPERATIONS_TOTAL.with_label_values(&[op]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
