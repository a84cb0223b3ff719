pub mod admin;
pub mod appointment;
pub mod config;
pub mod database;
pub mod models;
pub mod protocol;
pub mod schema;
pub mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App,
};

use crate::admin::{credentials::CredentialStore, PurgePolicy};

pub use crate::database::DbPool;

/// Everything the handlers pull out of `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub pool: web::Data<DbPool>,
    pub credentials: web::Data<dyn CredentialStore>,
    pub purge_policy: web::Data<PurgePolicy>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        credentials: Arc<dyn CredentialStore>,
        purge_policy: PurgePolicy,
    ) -> Self {
        Self {
            pool: web::Data::new(pool),
            credentials: web::Data::from(credentials),
            purge_policy: web::Data::new(purge_policy),
        }
    }
}

/// The complete application: CORS for every origin, request logging and all
/// routes. Called once per worker by `HttpServer`.
pub fn app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .wrap(Cors::permissive())
        .app_data(state.pool)
        .app_data(state.credentials)
        .app_data(state.purge_policy)
        .configure(config)
}

/// Mounts every endpoint under `/api`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(protocol::json_config()).service(
        web::scope("/api")
            .configure(appointment::config)
            .configure(admin::config),
    );
}
