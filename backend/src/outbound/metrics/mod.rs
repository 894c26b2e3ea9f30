//! Prometheus-backed business metrics. Compiled only with the `metrics`
//! feature.

mod prometheus_domain;

pub use prometheus_domain::PrometheusDomainMetrics;
