use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    pub sidecar_requests_total: IntCounterVec,
    pub sidecar_errors_total: IntCounterVec,
    pub sidecar_request_duration_seconds: HistogramVec,
    pub sidecar_ready: IntGauge,
    pub messages_received_total: IntCounter,
    pub messages_dropped_total: IntCounter,
    pub invocations_received_total: IntCounter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let sidecar_requests_total = IntCounterVec::new(
            Opts::new("sidecar_requests_total", "Requests forwarded to the sidecar"),
            &["op"],
        ).unwrap();
        let sidecar_errors_total = IntCounterVec::new(
            Opts::new("sidecar_errors_total", "Sidecar requests that failed"),
            &["op"],
        ).unwrap();
        let sidecar_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("sidecar_request_duration_seconds", "Sidecar request duration in seconds"),
            &["op"],
        ).unwrap();
        let sidecar_ready = IntGauge::new("sidecar_ready", "Sidecar health probe result 1/0").unwrap();
        let messages_received_total = IntCounter::new("messages_received_total", "Pub/sub messages delivered to this app").unwrap();
        let messages_dropped_total = IntCounter::new("messages_dropped_total", "Pub/sub messages answered with DROP").unwrap();
        let invocations_received_total = IntCounter::new("invocations_received_total", "Service invocations delivered to this app").unwrap();

        registry.register(Box::new(sidecar_requests_total.clone())).unwrap();
        registry.register(Box::new(sidecar_errors_total.clone())).unwrap();
        registry.register(Box::new(sidecar_request_duration_seconds.clone())).unwrap();
        registry.register(Box::new(sidecar_ready.clone())).unwrap();
        registry.register(Box::new(messages_received_total.clone())).unwrap();
        registry.register(Box::new(messages_dropped_total.clone())).unwrap();
        registry.register(Box::new(invocations_received_total.clone())).unwrap();

        Self {
            registry,
            sidecar_requests_total,
            sidecar_errors_total,
            sidecar_request_duration_seconds,
            sidecar_ready,
            messages_received_total,
            messages_dropped_total,
            invocations_received_total,
        }
    }

    /// Records one completed sidecar call.
    pub fn observe_call(&self, op: &str, seconds: f64, ok: bool) {
        self.sidecar_requests_total.with_label_values(&[op]).inc();
        self.sidecar_request_duration_seconds.with_label_values(&[op]).observe(seconds);
        if !ok {
            self.sidecar_errors_total.with_label_values(&[op]).inc();
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or(());
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_call() {
        let m = Metrics::new();
        m.observe_call("publish", 0.01, true);
        m.observe_call("publish", 0.02, false);
        assert_eq!(m.sidecar_requests_total.with_label_values(&["publish"]).get(), 2);
        assert_eq!(m.sidecar_errors_total.with_label_values(&["publish"]).get(), 1);

        let text = String::from_utf8(m.encode()).unwrap();
        assert!(text.contains("sidecar_requests_total{op=\"publish\"} 2"));
    }
}
