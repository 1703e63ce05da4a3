// src/bin/probe_backend.rs
//
// Manual smoke check against a running analytics backend:
// ANALYTICS_API_URL=http://127.0.0.1:8000 cargo run --bin probe_backend
use factor_dashboard_api::services::analytics::AnalyticsClient;
use factor_dashboard_api::services::transforms::cumulate;
use factor_dashboard_api::BoxError;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let base_url = std::env::var("ANALYTICS_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let client = AnalyticsClient::new(base_url);

    let factors = client.factors().await;
    println!("Catalog ({} factors): {:?}", factors.len(), factors);

    if let Some(factor) = factors.first() {
        let series = client.returns(factor, None, None).await;
        let levels = cumulate(&series.ret);
        println!(
            "{}: {} trading days, last cumulative level {:?}",
            factor,
            series.dates.len(),
            levels.last()
        );

        if let Some(wave) = client.global_wave(factor).await {
            println!(
                "Global Wave for {}: {} troughs, {} peaks, {} events listed",
                factor,
                wave.summary.trough.n_events,
                wave.summary.peak.n_events,
                wave.events.map_or(0, |e| e.len())
            );
        }
    }

    Ok(())
}
