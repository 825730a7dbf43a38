// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wodboard shell: bootstrap and persistence glue for the Wodboard UI.
//!
//! This crate serves the SPA shell page (with vendor scripts injected),
//! bridges the UI runtime's message ports, and wires them to an identity
//! provider and a user-record store - remote (Firestore) or local fallback.

pub mod adapter;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod ports;
pub mod routes;
pub mod services;
pub mod store;

use tokio::sync::{mpsc, Mutex};

use adapter::AuthEvent;
use config::Config;
use ports::{UiCommand, UiPorts};
use services::IdentityClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub identity: IdentityClient,
    /// Outbound port sender feeding the adapter
    pub commands: mpsc::UnboundedSender<UiCommand>,
    /// Identity events feeding the adapter
    pub auth_events: mpsc::UnboundedSender<AuthEvent>,
    /// UI-side port receivers; taken by the first events subscriber
    pub ui: Mutex<Option<UiPorts>>,
}
