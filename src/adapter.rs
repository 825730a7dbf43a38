// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence adapter.
//!
//! Translates outbound port events into store operations, and store results
//! and identity callbacks into inbound port deliveries. One task, spawned at
//! startup, running until both input channels close. Every operation is
//! fire-and-forget: nothing is retried and no failure is fatal.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::models::UserProfile;
use crate::ports::{FailureEvent, Feedback, InboundPorts, PortOp, UiCommand};
use crate::store::StorageBackend;

const SAVE_TOAST: &str = "Results saved";
const SAVE_TOAST_MS: u32 = 4000;

/// Identity events delivered by the redirect flow.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// The redirect completed and the provider reported a subject.
    SignedIn { profile: UserProfile },
    /// The redirect flow failed. The page stays up and sign-in may be retried.
    SignInFailed { code: String, message: String },
}

/// The glue between the port table and the storage backend.
///
/// Constructed explicitly at startup with the backend handle it forwards to;
/// there is no process-wide store singleton.
pub struct PersistenceAdapter {
    store: Arc<dyn StorageBackend>,
    ports: InboundPorts,
    sign_in_url: String,
}

impl PersistenceAdapter {
    pub fn new(
        store: Arc<dyn StorageBackend>,
        ports: InboundPorts,
        sign_in_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            ports,
            sign_in_url: sign_in_url.into(),
        }
    }

    /// Spawn the adapter loop.
    pub fn spawn(
        self,
        commands: mpsc::UnboundedReceiver<UiCommand>,
        auth_events: mpsc::UnboundedReceiver<AuthEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(commands, auth_events))
    }

    async fn run(
        self,
        mut commands: mpsc::UnboundedReceiver<UiCommand>,
        mut auth_events: mpsc::UnboundedReceiver<AuthEvent>,
    ) {
        loop {
            tokio::select! {
                Some(command) = commands.recv() => self.handle_command(command).await,
                Some(event) = auth_events.recv() => self.handle_auth_event(event),
                else => break,
            }
        }
        tracing::debug!("Persistence adapter stopped");
    }

    /// The static wiring table: each outbound port name maps to exactly one
    /// handler here.
    async fn handle_command(&self, command: UiCommand) {
        match command {
            UiCommand::SignIn => {
                self.send_feedback(Feedback::BeginSignIn {
                    url: self.sign_in_url.clone(),
                });
            }
            UiCommand::SaveResults { user_uid, wods } => {
                match self.store.save_results(&user_uid, &wods).await {
                    Ok(()) => {
                        tracing::info!(user_uid = %user_uid, entries = wods.len(), "Results saved");
                        self.send_feedback(Feedback::Toast {
                            message: SAVE_TOAST.to_string(),
                            duration_ms: SAVE_TOAST_MS,
                        });
                    }
                    Err(e) => self.report_failure(PortOp::SaveResults, &e),
                }
            }
            UiCommand::SaveGender { user_uid, gender } => {
                if let Err(e) = self.store.save_gender(&user_uid, &gender).await {
                    self.report_failure(PortOp::SaveGender, &e);
                }
            }
            UiCommand::SaveUnits { user_uid, units } => {
                if let Err(e) = self.store.save_units(&user_uid, &units).await {
                    self.report_failure(PortOp::SaveUnits, &e);
                }
            }
            UiCommand::RefreshFields => {
                self.send_feedback(Feedback::RefreshTextFields);
            }
        }
    }

    fn handle_auth_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn { profile } => {
                tracing::info!(user_uid = %profile.user_uid, "Subject signed in");

                let user_uid = profile.user_uid.clone();
                let provider_gender = profile.gender.clone();
                let _ = self.ports.signed_in.send(profile);

                // Gender reported by the provider itself; the stored value,
                // if any, arrives separately from the load below.
                if let Some(gender) = provider_gender {
                    let _ = self.ports.gender.send(gender);
                }

                self.spawn_loads(user_uid);
            }
            AuthEvent::SignInFailed { code, message } => {
                tracing::warn!(code = %code, error = %message, "Sign-in failed");
                let _ = self.ports.failures.send(FailureEvent {
                    operation: PortOp::SignIn,
                    message: format!("{}: {}", code, message),
                });
            }
        }
    }

    /// Issue the three one-shot reads for a freshly connected subject.
    ///
    /// The reads are independent tasks with no relative order and no
    /// atomicity between them; partial delivery is expected. A read that
    /// finds nothing sends nothing.
    fn spawn_loads(&self, user_uid: String) {
        {
            let store = Arc::clone(&self.store);
            let port = self.ports.results.clone();
            let failures = self.ports.failures.clone();
            let uid = user_uid.clone();
            tokio::spawn(async move {
                match store.load_results(&uid).await {
                    Ok(Some(wods)) => {
                        let _ = port.send(wods);
                    }
                    Ok(None) => {}
                    Err(e) => report_load_failure(&failures, PortOp::LoadResults, &uid, &e),
                }
            });
        }

        {
            let store = Arc::clone(&self.store);
            let port = self.ports.gender.clone();
            let failures = self.ports.failures.clone();
            let uid = user_uid.clone();
            tokio::spawn(async move {
                match store.load_gender(&uid).await {
                    Ok(Some(gender)) => {
                        let _ = port.send(gender);
                    }
                    Ok(None) => {}
                    Err(e) => report_load_failure(&failures, PortOp::LoadGender, &uid, &e),
                }
            });
        }

        {
            let store = Arc::clone(&self.store);
            let port = self.ports.units.clone();
            let failures = self.ports.failures.clone();
            tokio::spawn(async move {
                match store.load_units(&user_uid).await {
                    Ok(Some(units)) => {
                        let _ = port.send(units);
                    }
                    Ok(None) => {}
                    Err(e) => report_load_failure(&failures, PortOp::LoadUnits, &user_uid, &e),
                }
            });
        }
    }

    fn send_feedback(&self, feedback: Feedback) {
        let _ = self.ports.feedback.send(feedback);
    }

    fn report_failure(&self, operation: PortOp, error: &AppError) {
        tracing::warn!(?operation, error = %error, "Store operation failed");
        let _ = self.ports.failures.send(FailureEvent {
            operation,
            message: error.to_string(),
        });
    }
}

fn report_load_failure(
    failures: &mpsc::UnboundedSender<FailureEvent>,
    operation: PortOp,
    user_uid: &str,
    error: &AppError,
) {
    tracing::warn!(?operation, user_uid = %user_uid, error = %error, "Load failed");
    let _ = failures.send(FailureEvent {
        operation,
        message: error.to_string(),
    });
}
