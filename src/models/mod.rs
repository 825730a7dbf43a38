// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod results;
pub mod user;

pub use results::Wods;
pub use user::{UserProfile, UserRecord};
