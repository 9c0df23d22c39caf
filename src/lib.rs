// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Auth - Revocable Bearer Token Service
//!
//! This crate issues RS256-signed access tokens and keeps one server-side
//! record per token in a revocation store, so a token can be revoked
//! (logout) before it expires.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token signer, request context and middleware
//! - `clock` - Injectable time source
//! - `store` - Revocation store (Redis and in-memory)
//! - `users` - User directory used by login and registration

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;
