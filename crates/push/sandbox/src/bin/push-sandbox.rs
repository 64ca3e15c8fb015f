//! Push Sandbox - local stand-in for the push registration API.

use std::net::SocketAddr;

use axum::Router;
use color_eyre::eyre::WrapErr as _;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("push-sandbox starting");

    let addr: SocketAddr = std::env::var("SANDBOX_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8090".to_string())
        .parse()
        .wrap_err("invalid SANDBOX_ADDR")?;

    let mut state = push_sandbox::SandboxState::new();
    if let Ok(key) = std::env::var("SANDBOX_AUTH_KEY") {
        tracing::info!("auth key required");
        state = state.with_auth_key(key);
    }

    let app = Router::new()
        .merge(push_sandbox::push_router(state))
        .layer(TraceLayer::new_for_http());

    tracing::info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err("failed to bind")?;

    axum::serve(listener, app).await.wrap_err("server error")?;

    Ok(())
}
