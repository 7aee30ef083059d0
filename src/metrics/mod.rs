use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

// ============================================================================
// Metrics Module - Prometheus metrics for the order workflows
// ============================================================================
//
// Provides metrics for:
// - Order creation (successes, failures by reason, latency)
// - Order lookups (hits and misses)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the service
pub struct Metrics {
    registry: Registry,

    // Order Creation Metrics
    pub orders_created: IntCounter,
    pub order_failures: IntCounterVec,
    pub create_order_duration: Histogram,

    // Order Lookup Metrics
    pub order_lookups: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Order Creation Metrics
        let orders_created = IntCounter::new("orders_created_total", "Total orders created")?;
        registry.register(Box::new(orders_created.clone()))?;

        let order_failures = IntCounterVec::new(
            Opts::new("order_failures_total", "Total order creations that failed"),
            &["reason"],
        )?;
        registry.register(Box::new(order_failures.clone()))?;

        let create_order_duration = Histogram::with_opts(
            HistogramOpts::new("create_order_duration_seconds", "Order creation duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(create_order_duration.clone()))?;

        // Order Lookup Metrics
        let order_lookups = IntCounterVec::new(
            Opts::new("order_lookups_total", "Order lookups by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(order_lookups.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            order_failures,
            create_order_duration,
            order_lookups,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record the outcome of one order creation
    pub fn record_order_created(&self, duration_secs: f64, failure_reason: Option<&str>) {
        match failure_reason {
            None => self.orders_created.inc(),
            Some(reason) => self.order_failures.with_label_values(&[reason]).inc(),
        }
        self.create_order_duration.observe(duration_secs);
    }

    /// Helper to record an order lookup
    pub fn record_order_lookup(&self, found: bool) {
        let outcome = if found { "found" } else { "not_found" };
        self.order_lookups.with_label_values(&[outcome]).inc();
    }

    /// Render every registered metric in the Prometheus text format
    pub fn encode(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
