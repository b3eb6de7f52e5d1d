//! HTTP boundary.
//!
//! Maps the `/auth` routes onto [`turnstile_auth::Authority`] and adds the
//! surrounding plumbing: request logging, CORS for one browser origin,
//! store health, and a JSON 404 for unknown routes.

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use turnstile_auth::Authority;
use turnstile_auth::Crypto;
use turnstile_core::Settings;
use turnstile_database::Postgres;

async fn root() -> impl Responder {
    HttpResponse::Ok().body("turnstile authentication service is running")
}

async fn health(authority: web::Data<Authority>) -> impl Responder {
    match authority
        .store()
        .ping()
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound()
        .json(serde_json::json!({ "message": "The requested route does not exist on this server" }))
}

/// Route table, shared by [`run`] and the tests.
#[rustfmt::skip]
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(turnstile_auth::json_config())
        .app_data(turnstile_auth::form_config())
        .app_data(turnstile_auth::path_config())
        .route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .service(
            web::scope("/auth")
                .route("/register",    web::post().to(turnstile_auth::register))
                .route("/login",       web::post().to(turnstile_auth::login))
                .route("/perfil",      web::get().to(turnstile_auth::profile))
                .route("/update",      web::put().to(turnstile_auth::update_self))
                .route("/update/{id}", web::put().to(turnstile_auth::update))
                .route("/delete",      web::delete().to(turnstile_auth::delete_self))
                .route("/delete/{id}", web::delete().to(turnstile_auth::delete)),
        );
}

/// Fallback for anything [`routes`] does not match.
pub fn fallback() -> actix_web::Route {
    web::to(not_found)
}

pub async fn run(settings: Settings) -> Result<(), std::io::Error> {
    let pool = turnstile_database::connect(&settings.database)
        .await
        .map_err(std::io::Error::other)?;
    let store = Postgres::new(pool);
    store.migrate().await.map_err(std::io::Error::other)?;
    let crypto = Crypto::from_settings(&settings);
    let authority = web::Data::new(Authority::new(Arc::new(store), crypto));
    let origin = settings.origin.clone();
    log::info!("issuing tokens valid for {}s", authority.crypto().lifetime().as_secs());
    log::info!("starting server on {}:{}", settings.host, settings.port);
    log::info!("allowing cross-origin requests from {}", origin);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allowed_origin(&origin)
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials(),
            )
            .app_data(authority.clone())
            .configure(routes)
            .default_service(fallback())
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
