//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog requests (search, details) by outcome
//! - Operations issued and superseded by the search and detail controllers
//! - Persistence failures that were swallowed

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Registry holding every core metric.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for metric in all_metrics() {
        if let Err(e) = registry.register(metric) {
            tracing::warn!("Failed to register metric: {}", e);
        }
    }
    registry
});

// =============================================================================
// Catalog
// =============================================================================

/// Catalog requests by operation and outcome.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "motionquest_catalog_requests_total",
            "Total catalog requests",
        ),
        &["operation", "outcome"], // outcome: "success", "config", "api", "http", "parse"
    )
    .unwrap()
});

// =============================================================================
// Controllers
// =============================================================================

/// Operations started by a controller.
pub static OPERATIONS_ISSUED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "motionquest_operations_issued_total",
            "Total fetch operations started by controllers",
        ),
        &["controller"], // "search", "details"
    )
    .unwrap()
});

/// Completed operations whose result was discarded because a newer one superseded it.
pub static STALE_RESPONSES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "motionquest_stale_responses_total",
            "Responses discarded because their operation was superseded",
        ),
        &["controller"],
    )
    .unwrap()
});

// =============================================================================
// Storage
// =============================================================================

/// Persistence failures swallowed by the KV adapter.
pub static STORAGE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "motionquest_storage_failures_total",
            "Persistence failures recovered by falling back",
        ),
        &["operation"], // "read", "write", "parse"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(OPERATIONS_ISSUED.clone()),
        Box::new(STALE_RESPONSES.clone()),
        Box::new(STORAGE_FAILURES.clone()),
    ]
}

/// Encode all metrics in the Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
