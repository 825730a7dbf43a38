// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Port boundary between the UI runtime and the persistence glue.
//!
//! Each port is a named, statically-typed one-way channel. The outbound
//! (UI → core) ports share a single command channel whose handlers form the
//! static wiring table; every inbound (core → UI) port has its own channel so
//! that no relative delivery order is imposed across ports. Wiring happens
//! exactly once at startup and lives for the process lifetime.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{UserProfile, Wods};

/// Outbound port events (UI → core).
///
/// Every variant maps to exactly one adapter handler; the payloads are the
/// agreed port shapes and nothing else crosses the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "port", rename_all = "kebab-case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum UiCommand {
    /// Request the redirect-based sign-in flow
    SignIn,
    /// Overwrite the subject's stored results
    SaveResults { user_uid: String, wods: Wods },
    /// Overwrite the subject's stored gender
    SaveGender { user_uid: String, gender: String },
    /// Overwrite the subject's stored unit preference
    SaveUnits { user_uid: String, units: String },
    /// Ask for a deferred text-field refresh
    RefreshFields,
}

/// Operations that can be reported on the `failures` port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum PortOp {
    SignIn,
    LoadResults,
    LoadGender,
    LoadUnits,
    SaveResults,
    SaveGender,
    SaveUnits,
}

/// A failed operation surfaced to the UI instead of being dropped.
///
/// A failure never takes the process down and is never retried; prior UI
/// state stays intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FailureEvent {
    pub operation: PortOp,
    pub message: String,
}

/// Transient UI feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Feedback {
    /// Short-lived notification
    Toast { message: String, duration_ms: u32 },
    /// Deferred text-field refresh requested by the UI
    RefreshTextFields,
    /// Navigation target for the sign-in redirect
    BeginSignIn { url: String },
}

/// Inbound port senders held by the persistence adapter.
#[derive(Clone)]
pub struct InboundPorts {
    pub signed_in: mpsc::UnboundedSender<UserProfile>,
    pub results: mpsc::UnboundedSender<Wods>,
    pub gender: mpsc::UnboundedSender<String>,
    pub units: mpsc::UnboundedSender<String>,
    pub failures: mpsc::UnboundedSender<FailureEvent>,
    pub feedback: mpsc::UnboundedSender<Feedback>,
}

/// Adapter-side end of the port table.
pub struct AdapterPorts {
    pub inbound: InboundPorts,
    pub commands: mpsc::UnboundedReceiver<UiCommand>,
}

/// UI-side end of the port table.
pub struct UiPorts {
    pub commands: mpsc::UnboundedSender<UiCommand>,
    pub signed_in: mpsc::UnboundedReceiver<UserProfile>,
    pub results: mpsc::UnboundedReceiver<Wods>,
    pub gender: mpsc::UnboundedReceiver<String>,
    pub units: mpsc::UnboundedReceiver<String>,
    pub failures: mpsc::UnboundedReceiver<FailureEvent>,
    pub feedback: mpsc::UnboundedReceiver<Feedback>,
}

/// A delivery drained from one of the inbound ports.
#[derive(Debug, Clone)]
pub enum PortEvent {
    SignedIn(UserProfile),
    Results(Wods),
    Gender(String),
    Units(String),
    Failure(FailureEvent),
    Feedback(Feedback),
}

impl PortEvent {
    /// Name of the port this delivery arrived on.
    pub fn port_name(&self) -> &'static str {
        match self {
            PortEvent::SignedIn(_) => "signed-in",
            PortEvent::Results(_) => "results",
            PortEvent::Gender(_) => "gender",
            PortEvent::Units(_) => "units",
            PortEvent::Failure(_) => "failures",
            PortEvent::Feedback(_) => "feedback",
        }
    }

    /// Payload serialized as JSON.
    pub fn payload_json(&self) -> String {
        let serialized = match self {
            PortEvent::SignedIn(profile) => serde_json::to_string(profile),
            PortEvent::Results(wods) => serde_json::to_string(wods),
            PortEvent::Gender(gender) => serde_json::to_string(gender),
            PortEvent::Units(units) => serde_json::to_string(units),
            PortEvent::Failure(failure) => serde_json::to_string(failure),
            PortEvent::Feedback(feedback) => serde_json::to_string(feedback),
        };
        serialized.unwrap_or_else(|_| "null".to_string())
    }
}

impl UiPorts {
    /// Wait for the next delivery on any inbound port.
    ///
    /// Returns `None` once every inbound channel has closed. Which port wins
    /// when several have pending deliveries is deliberately unspecified.
    pub async fn next_event(&mut self) -> Option<PortEvent> {
        tokio::select! {
            Some(profile) = self.signed_in.recv() => Some(PortEvent::SignedIn(profile)),
            Some(wods) = self.results.recv() => Some(PortEvent::Results(wods)),
            Some(gender) = self.gender.recv() => Some(PortEvent::Gender(gender)),
            Some(units) = self.units.recv() => Some(PortEvent::Units(units)),
            Some(failure) = self.failures.recv() => Some(PortEvent::Failure(failure)),
            Some(feedback) = self.feedback.recv() => Some(PortEvent::Feedback(feedback)),
            else => None,
        }
    }
}

/// Create every port channel pair. Called exactly once at startup; there is
/// no dynamic registration or deregistration afterwards.
pub fn mount() -> (AdapterPorts, UiPorts) {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (signed_in_tx, signed_in_rx) = mpsc::unbounded_channel();
    let (results_tx, results_rx) = mpsc::unbounded_channel();
    let (gender_tx, gender_rx) = mpsc::unbounded_channel();
    let (units_tx, units_rx) = mpsc::unbounded_channel();
    let (failures_tx, failures_rx) = mpsc::unbounded_channel();
    let (feedback_tx, feedback_rx) = mpsc::unbounded_channel();

    let adapter = AdapterPorts {
        inbound: InboundPorts {
            signed_in: signed_in_tx,
            results: results_tx,
            gender: gender_tx,
            units: units_tx,
            failures: failures_tx,
            feedback: feedback_tx,
        },
        commands: commands_rx,
    };

    let ui = UiPorts {
        commands: commands_tx,
        signed_in: signed_in_rx,
        results: results_rx,
        gender: gender_rx,
        units: units_rx,
        failures: failures_rx,
        feedback: feedback_rx,
    };

    (adapter, ui)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_roundtrip() {
        let (mut adapter, ui) = mount();

        ui.commands
            .send(UiCommand::SaveGender {
                user_uid: "abc".to_string(),
                gender: "female".to_string(),
            })
            .unwrap();

        match adapter.commands.recv().await.unwrap() {
            UiCommand::SaveGender { user_uid, gender } => {
                assert_eq!(user_uid, "abc");
                assert_eq!(gender, "female");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_next_event_drains_any_port() {
        let (adapter, mut ui) = mount();

        adapter.inbound.units.send("metric".to_string()).unwrap();

        let event = ui.next_event().await.unwrap();
        assert_eq!(event.port_name(), "units");
        assert_eq!(event.payload_json(), "\"metric\"");
    }

    #[tokio::test]
    async fn test_next_event_ends_when_adapter_side_drops() {
        let (adapter, mut ui) = mount();
        drop(adapter);

        assert!(ui.next_event().await.is_none());
    }

    #[test]
    fn test_command_port_names_serialize() {
        let json = serde_json::to_string(&UiCommand::SignIn).unwrap();
        assert_eq!(json, r#"{"port":"sign-in"}"#);

        let json = serde_json::to_string(&UiCommand::RefreshFields).unwrap();
        assert_eq!(json, r#"{"port":"refresh-fields"}"#);
    }
}
