use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use sorteo_backend::{
    config::Config,
    external::RaffleStoreClient,
    handlers,
    middlewares::create_cors,
    services::{DrawService, ParticipantService, PrizeService, SessionCache, WinnerService},
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let store =
        Arc::new(RaffleStoreClient::new(&config.store).expect("Failed to build store client"));
    let cache = Arc::new(SessionCache::new());

    // Warm the session cache; the server still starts on failure, handlers
    // read-repair once the store comes back
    if let Err(e) = cache.warm(store.as_ref()).await {
        log::error!("Initial cache load from store failed: {e}");
    }

    let draw_service = DrawService::new(store.clone(), cache.clone(), config.draw.animation_ms);
    let participant_service = ParticipantService::new(
        store.clone(),
        cache.clone(),
        draw_service.in_flight_flag(),
    );
    let prize_service = PrizeService::new(store.clone(), cache.clone());
    let winner_service = WinnerService::new(store.clone(), cache.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(draw_service.clone()))
            .app_data(web::Data::new(participant_service.clone()))
            .app_data(web::Data::new(prize_service.clone()))
            .app_data(web::Data::new(winner_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::participant_config)
                    .configure(handlers::prize_config)
                    .configure(handlers::draw_config)
                    .configure(handlers::winner_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
