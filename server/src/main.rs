mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Identity service config is non-fatal: without it the app still serves,
    // and the client surfaces a configuration-failure state.
    let service = match services::identity::ServiceConfig::from_env() {
        Some(config) => {
            tracing::info!(url = %config.url, "identity service configured");
            Some(config)
        }
        None => {
            tracing::warn!(
                "identity service not configured — set IDENTITY_SERVICE_URL and IDENTITY_SERVICE_ANON_KEY"
            );
            None
        }
    };

    let state = state::AppState::new(service);

    let app = routes::leptos_app(state).expect("leptos configuration failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "smartmarks listening");
    axum::serve(listener, app).await.expect("server failed");
}
