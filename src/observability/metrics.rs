//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_store_http_requests_total` (counter): requests by method, route, status
//! - `config_store_http_request_duration_seconds` (histogram): handler latency
//! - `config_store_operations_total` (counter): store operations by outcome
//! - `config_store_records` (gauge): records currently held
//!
//! Without an installed recorder every call here is a no-op, so the store
//! and tests record freely.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    metrics::describe_counter!(
        "config_store_http_requests_total",
        "HTTP requests handled, by method, route and status"
    );
    metrics::describe_histogram!(
        "config_store_http_request_duration_seconds",
        metrics::Unit::Seconds,
        "Time spent handling a request"
    );
    metrics::describe_counter!(
        "config_store_operations_total",
        "Store operations, by operation and outcome"
    );
    metrics::describe_gauge!("config_store_records", "Records currently held");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one store operation.
pub fn record_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "config_store_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Publish the current record count.
pub fn record_store_size(size: usize) {
    metrics::gauge!("config_store_records").set(size as f64);
}

/// Route-level middleware recording request count and latency.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = request.method().to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "config_store_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "config_store_http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}
