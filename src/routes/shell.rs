// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shell page with vendor script injection.

use axum::{extract::State, response::Html, routing::get, Router};
use std::sync::Arc;

use crate::AppState;

const SHELL_TEMPLATE: &str = include_str!("../../assets/shell.html");

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(shell))
}

/// Serve the SPA shell with the configured vendor scripts injected.
async fn shell(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(inject_script_tags(
        SHELL_TEMPLATE,
        &state.config.vendor_scripts,
    ))
}

/// Append one script tag per URL, in order, ahead of `</head>`.
///
/// There is no completion signal and no failure handling: the scripts are
/// presentation-only and nothing blocks on their availability. Injecting into
/// already-injected output duplicates the tags.
pub fn inject_script_tags(html: &str, urls: &[String]) -> String {
    let mut tags = String::new();
    for url in urls {
        tags.push_str("  <script src=\"");
        tags.push_str(url);
        tags.push_str("\"></script>\n");
    }

    match html.find("</head>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + tags.len());
            out.push_str(&html[..idx]);
            out.push_str(&tags);
            out.push_str(&html[idx..]);
            out
        }
        // No head to inject into: tack the tags on the end.
        None => {
            let mut out = html.to_string();
            out.push_str(&tags);
            out
        }
    }
}
