#[tokio::main]
async fn main() {
    quotecraft_observability::init();

    let config = quotecraft_api::config::Config::from_env();
    let app = quotecraft_api::app::build_app(config.font.clone());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
