//! Prometheus metrics.
//!
//! - `aiguidebook_http_requests_total` (counter) - requests by method, path, status
//! - `aiguidebook_http_request_duration_seconds` (histogram) - request latency
//! - `aiguidebook_classifications_total` (counter) - classifications by risk tier
//! - `aiguidebook_alerts_raised_total` (counter) - alerts raised
//! - `aiguidebook_declaration_conflicts_total` (counter) - rejected duplicates

use prometheus::{Counter, CounterVec, Encoder, HistogramVec, Opts, Registry, TextEncoder};

use crate::model::RiskTier;

pub struct AppMetrics {
    registry: Registry,
    http_requests_total: CounterVec,
    http_request_duration_seconds: HistogramVec,
    classifications_total: CounterVec,
    alerts_raised_total: Counter,
    declaration_conflicts_total: Counter,
}

impl AppMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests served")
                .namespace("aiguidebook"),
            &["method", "path", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .namespace("aiguidebook")
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["method", "path"],
        )?;

        let classifications_total = CounterVec::new(
            Opts::new(
                "classifications_total",
                "Risk classifications produced, by tier",
            )
            .namespace("aiguidebook"),
            &["tier"],
        )?;

        let alerts_raised_total = Counter::new(
            "aiguidebook_alerts_raised_total",
            "Alerts raised for high-risk classifications",
        )?;

        let declaration_conflicts_total = Counter::new(
            "aiguidebook_declaration_conflicts_total",
            "Declaration submissions rejected as duplicates",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(classifications_total.clone()))?;
        registry.register(Box::new(alerts_raised_total.clone()))?;
        registry.register(Box::new(declaration_conflicts_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            classifications_total,
            alerts_raised_total,
            declaration_conflicts_total,
        })
    }

    pub fn record_http(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        self.http_requests_total
            .with_label_values(&[method, path, &status.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    pub fn record_classification(&self, tier: RiskTier) {
        self.classifications_total
            .with_label_values(&[tier.as_str()])
            .inc();
    }

    pub fn record_alert(&self) {
        self.alerts_raised_total.inc();
    }

    pub fn record_declaration_conflict(&self) {
        self.declaration_conflicts_total.inc();
    }

    /// Encode all registered metrics in the Prometheus text format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|err| prometheus::Error::Msg(format!("non-utf8 metrics output: {}", err)))
    }
}
