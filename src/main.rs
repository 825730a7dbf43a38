// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wodboard shell server
//!
//! Bootstraps the workout-log SPA: serves the shell page, runs the
//! redirect-based sign-in flow, and glues the UI's message ports to the
//! configured user-record store.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wodboard_shell::{
    adapter::PersistenceAdapter, config::Config, ports, services::IdentityClient, store, AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        backend = ?config.storage_backend,
        "Starting Wodboard shell"
    );

    // Construct the storage backend selected for this process
    let store = store::from_config(&config)
        .await
        .expect("Failed to initialize storage backend");

    // Mount the port table (once, for the process lifetime)
    let (adapter_ports, ui) = ports::mount();

    // Identity events flow from the sign-in callback to the adapter
    let (auth_tx, auth_rx) = mpsc::unbounded_channel();

    let identity = IdentityClient::new(&config);

    // Wire the persistence adapter and let it run
    let adapter = PersistenceAdapter::new(store, adapter_ports.inbound, "/auth/signin");
    adapter.spawn(adapter_ports.commands, auth_rx);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        identity,
        commands: ui.commands.clone(),
        auth_events: auth_tx,
        ui: Mutex::new(Some(ui)),
    });

    // Build router
    let app = wodboard_shell::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wodboard_shell=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
