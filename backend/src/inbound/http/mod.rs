//! HTTP inbound adapter exposing the PVZ REST endpoints.

use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod dto;
pub mod error;
pub mod health;
pub mod items;
pub mod pickup_points;
pub mod receptions;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Mount every business route plus the JSON and query error handlers.
///
/// Health probes are registered separately because they need
/// [`health::HealthState`] rather than [`state::HttpState`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(accounts::dummy_login)
        .service(accounts::register)
        .service(accounts::login)
        .service(pickup_points::create_pickup_point)
        .service(pickup_points::list_pickup_points)
        .service(receptions::start_reception)
        .service(receptions::close_last_reception)
        .service(items::add_item)
        .service(items::delete_last_item);
}
