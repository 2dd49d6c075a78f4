use prometheus::{
    register_counter_with_registry, register_gauge_with_registry,
    register_histogram_with_registry, Counter, Encoder, Gauge, Histogram,
    HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::Result;

/// Metrics collector for the admin service.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    // Catalog mutations
    pub records_created: Counter,
    pub records_updated: Counter,
    pub records_deleted: Counter,
    pub mutation_failures: Counter,

    // Business metrics
    pub showtimes_scheduled: Counter,
    pub releases_created: Counter,
    pub reviews_moderated: Counter,
    pub catalog_size: Gauge,

    // Service metrics
    pub service_uptime: Gauge,
    pub request_duration: Histogram,
    pub errors: Counter,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let records_created = register_counter_with_registry!(
            Opts::new("records_created_total", "Total catalog records created"),
            registry
        )?;

        let records_updated = register_counter_with_registry!(
            Opts::new("records_updated_total", "Total catalog records updated"),
            registry
        )?;

        let records_deleted = register_counter_with_registry!(
            Opts::new("records_deleted_total", "Total catalog records deleted"),
            registry
        )?;

        let mutation_failures = register_counter_with_registry!(
            Opts::new("mutation_failures_total", "Total rejected catalog mutations"),
            registry
        )?;

        let showtimes_scheduled = register_counter_with_registry!(
            Opts::new("showtimes_scheduled_total", "Total showtimes scheduled"),
            registry
        )?;

        let releases_created = register_counter_with_registry!(
            Opts::new("releases_created_total", "Total movie releases created"),
            registry
        )?;

        let reviews_moderated = register_counter_with_registry!(
            Opts::new("reviews_moderated_total", "Total review visibility toggles"),
            registry
        )?;

        let catalog_size = register_gauge_with_registry!(
            Opts::new("catalog_size_records", "Current number of catalog records"),
            registry
        )?;

        let service_uptime = register_gauge_with_registry!(
            Opts::new("service_uptime_seconds", "Service uptime in seconds"),
            registry
        )?;

        let request_duration = register_histogram_with_registry!(
            HistogramOpts::new("request_duration_seconds", "Time spent processing requests")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            registry
        )?;

        let errors = register_counter_with_registry!(
            Opts::new("errors_total", "Total number of errors"),
            registry
        )?;

        Ok(Self {
            registry,
            records_created,
            records_updated,
            records_deleted,
            mutation_failures,
            showtimes_scheduled,
            releases_created,
            reviews_moderated,
            catalog_size,
            service_uptime,
            request_duration,
            errors,
        })
    }

    /// Export metrics in Prometheus text format.
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            crate::CinemaAdminError::InvalidArgument(format!(
                "metrics are not valid UTF-8: {e}"
            ))
        })
    }

    pub fn record_request(&self, duration: std::time::Duration, success: bool) {
        self.request_duration.observe(duration.as_secs_f64());
        if !success {
            self.errors.inc();
        }
    }

    pub fn update_catalog_size(&self, records: usize) {
        self.catalog_size.set(records as f64);
    }

    pub fn update_uptime(&self, uptime: std::time::Duration) {
        self.service_uptime.set(uptime.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_contains_registered_metrics() {
        let metrics = Metrics::new().unwrap();
        metrics.records_created.inc();
        metrics.update_catalog_size(12);
        let text = metrics.export().unwrap();
        assert!(text.contains("records_created_total 1"));
        assert!(text.contains("catalog_size_records 12"));
    }
}
