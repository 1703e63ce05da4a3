// src/handlers/factors.rs
use log::info;
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::analytics::AnalyticsClient;

#[derive(Serialize)]
struct FactorCatalog {
    factors: Vec<String>,
}

pub async fn get_factors(client: Arc<AnalyticsClient>) -> Result<Json, Rejection> {
    info!("Handling request for the factor catalog");
    let factors = client.factors().await;
    Ok(warp::reply::json(&FactorCatalog { factors }))
}
