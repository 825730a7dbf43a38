// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP/SSE bridge carrying the port table to the browser UI.
//!
//! Outbound ports are fire-and-forget POSTs, answered as soon as the command
//! is enqueued; inbound ports stream as named server-sent events. The UI-side
//! receivers exist exactly once, so the first events subscriber takes them
//! and any later subscription is rejected.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{self, Stream};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::Wods;
use crate::ports::UiCommand;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ports/sign-in", post(sign_in))
        .route("/ports/save-results", post(save_results))
        .route("/ports/save-gender", post(save_gender))
        .route("/ports/save-units", post(save_units))
        .route("/ports/refresh-fields", post(refresh_fields))
        .route("/ports/events", get(events))
}

#[derive(Deserialize)]
struct SaveResultsBody {
    user_uid: String,
    wods: Wods,
}

#[derive(Deserialize)]
struct SaveGenderBody {
    user_uid: String,
    gender: String,
}

#[derive(Deserialize)]
struct SaveUnitsBody {
    user_uid: String,
    units: String,
}

async fn sign_in(State(state): State<Arc<AppState>>) -> StatusCode {
    enqueue(&state, UiCommand::SignIn)
}

async fn save_results(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveResultsBody>,
) -> StatusCode {
    enqueue(
        &state,
        UiCommand::SaveResults {
            user_uid: body.user_uid,
            wods: body.wods,
        },
    )
}

async fn save_gender(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveGenderBody>,
) -> StatusCode {
    enqueue(
        &state,
        UiCommand::SaveGender {
            user_uid: body.user_uid,
            gender: body.gender,
        },
    )
}

async fn save_units(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveUnitsBody>,
) -> StatusCode {
    enqueue(
        &state,
        UiCommand::SaveUnits {
            user_uid: body.user_uid,
            units: body.units,
        },
    )
}

async fn refresh_fields(State(state): State<Arc<AppState>>) -> StatusCode {
    enqueue(&state, UiCommand::RefreshFields)
}

/// Fire-and-forget: accepted means enqueued, not completed.
fn enqueue(state: &AppState, command: UiCommand) -> StatusCode {
    match state.commands.send(command) {
        Ok(()) => StatusCode::ACCEPTED,
        Err(_) => {
            tracing::error!("Port command channel closed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Stream inbound port deliveries as named SSE events.
async fn events(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let ui = state.ui.lock().await.take().ok_or(AppError::PortsTaken)?;

    let stream = stream::unfold(ui, |mut ui| async move {
        let event = ui.next_event().await?;
        let sse = Event::default()
            .event(event.port_name())
            .data(event.payload_json());
        Some((Ok::<_, Infallible>(sse), ui))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
