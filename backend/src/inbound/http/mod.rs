//! HTTP inbound adapter exposing REST endpoints.

pub mod client;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod upload;
pub mod usernames;
pub mod usernames_dto;

use actix_web::{Scope, web};

use crate::domain::Error;

pub use error::ApiResult;

/// Largest accepted JSON body; sized for bulk lists.
pub const MAX_JSON_BODY_BYTES: usize = 1024 * 1024;

async fn unknown_endpoint() -> ApiResult<actix_web::HttpResponse> {
    Err(Error::not_found("no such endpoint"))
}

/// Build the `/api` scope with every JSON endpoint and extractor config.
///
/// Requires `web::Data<HttpState>` on the enclosing app.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(
            web::JsonConfig::default()
                .limit(MAX_JSON_BODY_BYTES)
                .error_handler(error::json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(usernames::check_username)
        .service(usernames::bulk_check)
        .service(usernames::bulk_check_file)
        .service(usernames::recent_checks)
        .service(usernames::clear_history)
        .service(usernames::check_stats)
        .service(health::api_status)
        .default_service(web::to(unknown_endpoint))
}
