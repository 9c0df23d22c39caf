// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Revocable RS256 bearer tokens for the Relational Auth API.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `/login`
//! 2. [`Signer::issue`] records `jti -> user id` in the revocation store and
//!    returns a signed token
//! 3. Client sends `Authorization: Bearer <token>`
//! 4. [`middleware::authenticate`]:
//!    - verifies signature, issuer and subject
//!    - checks `exp`/`iat` against the injected clock
//!    - loads the user id for `jti` from the store
//!    - binds identity and role into an [`AuthContext`]
//! 5. Handlers read the context with the [`Auth`] extractor
//!
//! ## Security
//!
//! - Tokens carry no user id; only the store maps them to an identity
//! - Deleting the store record (logout) revokes a token before `exp`
//! - All failures answer the same 401 so clients cannot probe which check failed
//! - No clock skew tolerance

pub mod claims;
pub mod context;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod middleware;
pub mod signer;

pub use claims::Claims;
pub use context::{AuthContext, ADMIN_ROLE};
pub use error::{AuthError, TokenError};
pub use extractor::Auth;
pub use keys::{KeyError, SigningKeys};
pub use middleware::{authenticate, require_admin, AuthenticatedRequest};
pub use signer::Signer;
