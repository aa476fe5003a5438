//! Prometheus metrics for the mock server.
//!
//! Tracks served requests, match outcomes, management operations and the
//! size of the live route collection.
use lazy_static::lazy_static;
use prometheus::{
    register_int_counter_vec, register_int_gauge, Encoder, IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    /// Total number of mock requests served
    pub static ref REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "mock_requests_total",
        "Total number of requests served by the mock endpoints",
        &["method", "status"]
    )
    .unwrap();

    /// Route lookups by outcome
    pub static ref ROUTE_MATCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "mock_route_matches_total",
        "Route lookups by outcome",
        &["result"]  // result: matched|unmatched
    )
    .unwrap();

    /// Management API operations
    pub static ref MANAGEMENT_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "mock_management_operations_total",
        "Management API operations by type and outcome",
        &["operation", "result"]  // result: success|invalid|not_found|error
    )
    .unwrap();

    /// Number of routes currently configured
    pub static ref ROUTES_CONFIGURED: IntGauge = register_int_gauge!(
        "mock_routes_configured",
        "Number of routes currently configured"
    )
    .unwrap();
}

/// Record a served mock request
pub fn record_request(method: &str, status: u16) {
    REQUESTS_TOTAL
        .with_label_values(&[method, &status.to_string()])
        .inc();
}

/// Record whether a request found a route
pub fn record_match(matched: bool) {
    let result = if matched { "matched" } else { "unmatched" };
    ROUTE_MATCHES_TOTAL.with_label_values(&[result]).inc();
}

/// Record a management operation outcome
pub fn record_management_operation(operation: &str, result: &str) {
    MANAGEMENT_OPERATIONS_TOTAL
        .with_label_values(&[operation, result])
        .inc();
}

/// Update the configured-routes gauge
pub fn set_routes_configured(count: usize) {
    ROUTES_CONFIGURED.set(count as i64);
}

/// Render all registered metrics in the Prometheus text format
pub fn collect_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
