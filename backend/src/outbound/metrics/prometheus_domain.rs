//! Prometheus adapter for the business event counters.
//!
//! Metrics are registered on the registry shared with `actix-web-prom`, so
//! they appear on `/metrics` next to the HTTP request metrics.
//!
//! - `pvz_pickup_points_opened_total{city}`
//! - `pvz_receptions_started_total`
//! - `pvz_items_added_total`

use async_trait::async_trait;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use crate::domain::City;
use crate::domain::ports::{DomainMetrics, DomainMetricsError};

/// Prometheus-backed [`DomainMetrics`].
pub struct PrometheusDomainMetrics {
    pickup_points_opened: IntCounterVec,
    receptions_started: IntCounter,
    items_added: IntCounter,
}

impl PrometheusDomainMetrics {
    /// Create and register the counters.
    ///
    /// # Errors
    ///
    /// Fails when a counter with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let pickup_points_opened = IntCounterVec::new(
            Opts::new("pvz_pickup_points_opened_total", "Pickup points opened by city"),
            &["city"],
        )?;
        let receptions_started = IntCounter::with_opts(Opts::new(
            "pvz_receptions_started_total",
            "Receptions started",
        ))?;
        let items_added =
            IntCounter::with_opts(Opts::new("pvz_items_added_total", "Items added to receptions"))?;

        registry.register(Box::new(pickup_points_opened.clone()))?;
        registry.register(Box::new(receptions_started.clone()))?;
        registry.register(Box::new(items_added.clone()))?;

        Ok(Self {
            pickup_points_opened,
            receptions_started,
            items_added,
        })
    }
}

#[async_trait]
impl DomainMetrics for PrometheusDomainMetrics {
    async fn record_pickup_point_opened(&self, city: City) -> Result<(), DomainMetricsError> {
        self.pickup_points_opened
            .get_metric_with_label_values(&[city.as_str()])
            .map_err(|err| DomainMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }

    async fn record_reception_started(&self) -> Result<(), DomainMetricsError> {
        self.receptions_started.inc();
        Ok(())
    }

    async fn record_item_added(&self) -> Result<(), DomainMetricsError> {
        self.items_added.inc();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counters_are_registered_and_incremented() {
        let registry = Registry::new();
        let metrics = PrometheusDomainMetrics::new(&registry).expect("registration succeeds");

        metrics
            .record_pickup_point_opened(City::Kazan)
            .await
            .expect("recorded");
        metrics.record_reception_started().await.expect("recorded");
        metrics.record_item_added().await.expect("recorded");
        metrics.record_item_added().await.expect("recorded");

        assert_eq!(metrics.receptions_started.get(), 1);
        assert_eq!(metrics.items_added.get(), 2);
        assert_eq!(
            metrics
                .pickup_points_opened
                .with_label_values(&["Казань"])
                .get(),
            1
        );
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.name().to_owned())
            .collect();
        assert!(names.iter().any(|name| name == "pvz_items_added_total"));
    }

    #[test]
    fn double_registration_fails() {
        let registry = Registry::new();
        let _first = PrometheusDomainMetrics::new(&registry).expect("first registration");
        assert!(PrometheusDomainMetrics::new(&registry).is_err());
    }
}
