// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication and role checks).

pub mod auth;

pub use auth::{require_admin, require_auth, AuthUser};
