// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay Service
//!
//! Serves the contact form's submission endpoint and relays each accepted
//! submission to the operator inbox through the Resend email API.
//!
//! ## Endpoints
//!
//! - `POST /send-contact-email`: submit a contact form (JSON)
//! - `GET /health`, `GET /healthz`: liveness
//! - `GET /metrics`: Prometheus counters (unless disabled)
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (and `.env`):
//!
//! - `RESEND_API_KEY`: provider API key (required)
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX`: Max submissions per window per client (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length in seconds (default: 60)
//! - `CONTACT_FROM` / `CONTACT_TO`: sender identity and operator inbox

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_relay::{config::Config, handlers::router, AppState, ResendDispatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    dotenvy::dotenv().ok();

    // Fails before binding if the API key is missing
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_per_window = config.rate_limit.max_per_window,
        window_secs = config.rate_limit.window_secs,
        metrics = config.metrics.enabled,
        "Starting contact relay"
    );

    let dispatcher = ResendDispatcher::new(&config.email)?;
    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = Arc::new(AppState::new(config, dispatcher)?);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
