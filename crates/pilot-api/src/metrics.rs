//! Prometheus counters served on `/metrics`.
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct ApiMetrics {
    registry: Registry,
    pub match_requests: IntCounterVec,
    pub match_fallbacks: IntCounter,
    pub allocation_failures: IntCounterVec,
    pub plans: IntCounterVec,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let match_requests = IntCounterVec::new(
            Opts::new("pilot_match_requests_total", "Inventory match requests"),
            &["category"],
        )?;
        let match_fallbacks = IntCounter::new(
            "pilot_match_fallbacks_total",
            "Match requests answered by the broadened search",
        )?;
        let allocation_failures = IntCounterVec::new(
            Opts::new("pilot_allocation_failures_total", "Rejected budget breakdowns"),
            &["code"],
        )?;
        let plans = IntCounterVec::new(
            Opts::new("pilot_plans_total", "Planning runs"),
            &["outcome"],
        )?;

        registry.register(Box::new(match_requests.clone()))?;
        registry.register(Box::new(match_fallbacks.clone()))?;
        registry.register(Box::new(allocation_failures.clone()))?;
        registry.register(Box::new(plans.clone()))?;

        Ok(Self {
            registry,
            match_requests,
            match_fallbacks,
            allocation_failures,
            plans,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

pub fn encode(registry: &Registry) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}
