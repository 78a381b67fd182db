//! Serve command - runs API + static site combined on the same port

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::create_router_with_state;

/// Run the combined API + static site server
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let state = crate::create_app_state_with_config(&config).await?;
    let options = crate::router_options(&config);

    match &options.static_dir {
        Some(dir) => info!("Serving static site from {}", dir.display()),
        None => warn!(
            "Static directory {} not found, serving API only",
            config.content.static_dir.display()
        ),
    }

    let app = create_router_with_state(state, &options);

    let addr = super::socket_addr(&config.server.host, config.server.port)?;
    info!("Starting server (API + site) on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(super::shutdown_signal())
    .await?;

    Ok(())
}
