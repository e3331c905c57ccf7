use actix_cors::Cors;
use actix_web::{App, HttpServer, web};

use crate::adapters::api::{ApiState, configure_routes};
use crate::app::config::AppConfig;
use crate::app::error::AppError;
use crate::app::services::InMemorySessionService;

pub fn run(config: AppConfig) -> Result<(), AppError> {
    let api_state = ApiState {
        sessions: InMemorySessionService::new(),
        summary_bounds: config.summary_bounds,
    };
    let cors_allowed_origins = config.cors_allowed_origins.clone();

    tracing::info!(bind = %config.http_bind, "http server starting");

    let server_result = actix_web::rt::System::new().block_on(async move {
        let mut server = HttpServer::new(move || {
            App::new()
                .wrap(build_cors(&cors_allowed_origins))
                .app_data(web::Data::new(api_state.clone()))
                .configure(configure_routes)
        });
        if let Some(workers) = config.http_workers {
            server = server.workers(workers);
        }

        server.bind(&config.http_bind)?.run().await
    });

    tracing::info!("http server stopped");

    server_result.map_err(AppError::runtime)
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT"])
        .allow_any_header()
        .max_age(3600)
}
