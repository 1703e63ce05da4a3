// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::{
    factors::get_factors,
    global_wave::{get_global_wave, get_global_wave_signals, GlobalWaveQuery, SignalsQuery},
    heatmap::get_heatmap,
    performance::{get_performance, PerformanceQuery},
};
use crate::services::analytics::AnalyticsClient;

// Recovery handling for our custom errors. Upstream analytics failures
// never reject (they degrade to empty sections), so anything landing here
// is a client mistake or an unknown path.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = api_error.message.clone();
    } else if let Some(invalid) = err.find::<warp::reject::InvalidQuery>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = invalid.to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    client: Arc<AnalyticsClient>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let client_filter = warp::any().map(move || client.clone());

    let factors_route = warp::path!("api" / "v1" / "factors")
        .and(warp::get())
        .and(client_filter.clone())
        .and_then(get_factors);

    let performance_route = warp::path!("api" / "v1" / "performance")
        .and(warp::get())
        .and(warp::query::<PerformanceQuery>())
        .and(client_filter.clone())
        .and_then(get_performance);

    let heatmap_route = warp::path!("api" / "v1" / "heatmap")
        .and(warp::get())
        .and(client_filter.clone())
        .and_then(get_heatmap);

    let global_wave_route = warp::path!("api" / "v1" / "global-wave")
        .and(warp::get())
        .and(warp::query::<GlobalWaveQuery>())
        .and(client_filter.clone())
        .and_then(get_global_wave);

    let signals_route = warp::path!("api" / "v1" / "global-wave" / "signals")
        .and(warp::get())
        .and(warp::query::<SignalsQuery>())
        .and(client_filter.clone())
        .and_then(get_global_wave_signals);

    info!("All routes configured successfully.");

    factors_route
        .or(performance_route)
        .or(heatmap_route)
        .or(signals_route)
        .or(global_wave_route)
        .recover(handle_rejection)
}
