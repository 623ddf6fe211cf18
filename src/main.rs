// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use volunteerhub_server::api::router;
use volunteerhub_server::config::{Config, LOG_FORMAT_ENV};
use volunteerhub_server::mailer::Mailer;
use volunteerhub_server::state::AppState;
use volunteerhub_server::storage::CredentialStore;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env();

    let store_path = config.data_dir.join("credentials.redb");
    let store = CredentialStore::open(&store_path).expect("Failed to open credential store");

    let mailer = Mailer::from_config(config.mail.as_ref());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    let state = AppState::new(store, config, mailer);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("VolunteerHub identity service listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = std::env::var(LOG_FORMAT_ENV).as_deref() == Ok("json");
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install ctrl-c handler");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
