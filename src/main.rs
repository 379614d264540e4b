mod config;
mod error;
mod mediator;
mod model;
mod web;

#[cfg(test)]
mod mock_backend;

use actix_web::{web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use config::Config;
use mediator::RequestMediator;
use model::GenerationClient;
use web::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting chat relay");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let client = match GenerationClient::new(config.generation_endpoint.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build generation client: {}", e);
            std::process::exit(1);
        }
    };
    info!("Using generation backend at: {}", client.endpoint());

    let mediator = Data::new(RequestMediator::new(client));

    info!("Listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(mediator.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
