use dotenv::dotenv;
use env_logger;
use log::{info, warn};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use factor_dashboard_api::routes;
use factor_dashboard_api::services::analytics::AnalyticsClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });
    let port: u16 = port_str.parse().expect("PORT must be a number");
    info!("Using PORT: {}", port);

    let backend_url = env::var("ANALYTICS_API_URL").unwrap_or_else(|_| {
        warn!("$ANALYTICS_API_URL not set, defaulting to http://127.0.0.1:8000");
        "http://127.0.0.1:8000".to_string()
    });
    info!("Using analytics backend: {}", backend_url);

    let client = Arc::new(AnalyticsClient::new(backend_url));

    // Bind to 0.0.0.0 so the dashboard frontend can reach us from anywhere
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let api = routes::routes(client).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
