use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vidfetch_server::config::Config;
use vidfetch_server::extract::YtDlp;
use vidfetch_server::state::AppState;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // Initialize tracing — JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vidfetch_server=info,tower_http=info".parse().unwrap());

    if config.is_dev {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    }

    info!("vidfetch-server starting...");
    info!(ytdlp = %config.ytdlp_bin, "using extraction tool");

    let app_state = AppState {
        ytdlp: YtDlp::new(config.ytdlp_bin.clone()),
    };

    // Prometheus metrics stay here rather than in `app()`: the recorder is a
    // process-wide global and can only be installed once.
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = vidfetch_server::app(app_state)
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer);

    let addr = config.server_addr();
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
