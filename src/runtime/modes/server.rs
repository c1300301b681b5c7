//! Server mode
//!
//! Configures and starts the HTTP server with all routes.

use std::time::Duration;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Compress};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::{EdgeGate, RequestIdMiddleware};
use crate::api::services::configure;
use crate::config::get_config;
use crate::runtime::lifetime::{self, StartupContext};
use crate::services::PUBLIC_PREFIX;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::prepare_server_startup().await.map_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
        e
    })?;

    let config = get_config();
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    info!("Using {} CPU cores for the server", cpu_count);

    let storage = startup.storage.clone();
    let server = build_server(startup, cpu_count, &bind_address)?;
    warn!("Starting server at http://{}", bind_address);

    let handle = server.handle();
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown: server stopped");
        }
    }

    lifetime::shutdown::close_resources(storage.as_ref().clone()).await;
    Ok(())
}

fn build_server(
    startup: StartupContext,
    workers: usize,
    bind_address: &str,
) -> Result<actix_web::dev::Server> {
    let uploads_mount = PUBLIC_PREFIX.trim_end_matches('/').to_string();
    let upload_root = startup.uploads.root().to_path_buf();
    let startup = std::sync::Arc::new(startup);

    let server = HttpServer::new(move || {
        let startup = startup.clone();
        App::new()
            .wrap(EdgeGate::new(startup.sessions.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .configure(|cfg| startup.register(cfg))
            .service(Files::new(&uploads_mount, &upload_root))
            .configure(configure)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(workers)
    .bind(bind_address)?
    .run();

    Ok(server)
}
