//! Prometheus metrics for the ledger node.
//!
//! Node-level metrics follow `ledger_node_<metric>_<unit>` and live in a
//! dedicated registry. The core crate registers its own counters with the
//! default registry; [`encode_metrics`] exports both.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Node metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// HTTP requests served, by route and status code
    pub static ref HTTP_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_node_http_requests_total", "Total HTTP requests served"),
        &["route", "status"]
    ).expect("metric creation failed");

    /// HTTP handler latency
    pub static ref HTTP_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "ledger_node_http_request_duration_seconds",
            "Time spent handling HTTP requests"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("valid buckets")),
        &["route"]
    ).expect("metric creation failed");

    /// Position of the chain tail
    pub static ref CHAIN_HEIGHT: IntGauge = IntGauge::new(
        "ledger_node_chain_height",
        "Position of the last appended block"
    ).expect("metric creation failed");

    /// Elections run by the node, by trigger: `genesis`, `schedule` or `on_demand`
    pub static ref ELECTIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("ledger_node_elections_total", "Elections run by the node"),
        &["trigger"]
    ).expect("metric creation failed");
}

/// Register node metrics with [`REGISTRY`]. Calling twice is harmless.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUESTS.clone()),
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(CHAIN_HEIGHT.clone()),
        Box::new(ELECTIONS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode node and core metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut metric_families = prometheus::gather();
    metric_families.extend(REGISTRY.gather());

    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_encode_includes_node_metrics() {
        register_metrics().unwrap();
        CHAIN_HEIGHT.set(7);
        HTTP_REQUESTS.with_label_values(&["GET /", "200"]).inc();

        let text = encode_metrics().unwrap();
        assert!(text.contains("ledger_node_chain_height 7"));
        assert!(text.contains("ledger_node_http_requests_total"));
    }
}
