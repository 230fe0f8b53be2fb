use covid_scenes::{load, resolve_source, router, AppState};
use std::{env, net::SocketAddr};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let source = resolve_source();
    // Load once; on failure the server still starts and every scene
    // reports the missing dataset instead of rendering.
    let dataset = match load(&source).await {
        Ok(dataset) => Some(dataset),
        Err(err) => {
            error!("failed to load dataset from {source}: {err}");
            None
        }
    };

    let state = AppState::new(source.to_string(), dataset);
    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
