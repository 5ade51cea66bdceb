use std::process::ExitCode;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use home_planner::cache::CachedFeedFetcher;
use home_planner::config::AppConfig;
use home_planner::efa::EfaClient;
use home_planner::engine::Engine;
use home_planner::fetch::HttpFeedFetcher;
use home_planner::iris::IrisClient;
use home_planner::routes::{JsonRouteSource, TrackedRouteSource};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "home_planner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| format!("configuration: {e}"))?;

    let mut fetcher = HttpFeedFetcher::new()
        .with_efa(EfaClient::new(config.efa.clone()).map_err(|e| format!("EFA client: {e}"))?);
    if let Some(iris) = config.iris.clone() {
        fetcher = fetcher
            .with_iris(IrisClient::new(iris).map_err(|e| format!("timetable client: {e}"))?);
    }

    let engine = Engine::new(
        CachedFeedFetcher::new(fetcher, &config.cache),
        config.engine.clone(),
    );
    let now = Utc::now();

    let mut args = std::env::args().skip(1);
    match (args.next().as_deref(), args.next()) {
        (Some("discover"), Some(station_id)) => {
            let response = engine
                .discover_routes(&station_id, now)
                .await
                .map_err(|e| e.to_string())?;
            info!(station_id = %station_id, count = response.count, "discovered routes");
            print_json(&response)
        }
        (None, _) => {
            let source = JsonRouteSource::new(&config.routes_file);
            let routes = source
                .load()
                .await
                .map_err(|e| format!("{}: {e}", source.path().display()))?;
            info!(routes = routes.len(), "loaded tracked routes");

            let response = engine
                .reconcile(&routes, now)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&response)
        }
        _ => Err("usage: home-planner [discover <station-id>]".to_string()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
