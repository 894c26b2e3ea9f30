//! Port for business event counters.
//!
//! Services record events after a successful state change and ignore
//! recording failures.

use async_trait::async_trait;

use crate::domain::City;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording business metrics.
    pub enum DomainMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "domain metrics exporter failed: {message}",
    }
}

/// Business event counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainMetrics: Send + Sync {
    /// A pickup point was opened in `city`.
    async fn record_pickup_point_opened(&self, city: City) -> Result<(), DomainMetricsError>;

    /// A reception was started.
    async fn record_reception_started(&self) -> Result<(), DomainMetricsError>;

    /// An item was added to a reception.
    async fn record_item_added(&self) -> Result<(), DomainMetricsError>;
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDomainMetrics;

#[async_trait]
impl DomainMetrics for NoOpDomainMetrics {
    async fn record_pickup_point_opened(&self, _city: City) -> Result<(), DomainMetricsError> {
        Ok(())
    }

    async fn record_reception_started(&self) -> Result<(), DomainMetricsError> {
        Ok(())
    }

    async fn record_item_added(&self) -> Result<(), DomainMetricsError> {
        Ok(())
    }
}
