//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod data_types;
pub mod entries;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` resource handler on `cfg`.
///
/// The caller mounts the result under `/api` and wraps it with the session
/// middleware; handlers expect [`state::HttpState`] in the app data. Body and
/// query extraction failures render as `invalid_request` errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
        .service(accounts::register)
        .service(accounts::login)
        .service(data_types::list_data_types)
        .service(data_types::create_data_type)
        .service(data_types::get_data_type)
        .service(data_types::update_data_type)
        .service(data_types::delete_data_type)
        .service(entries::list_entries)
        .service(entries::create_entry)
        .service(entries::get_entry)
        .service(entries::update_entry)
        .service(entries::delete_entry);
}
