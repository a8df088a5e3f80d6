//! Request extractors and response middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`diagnostics::attach_error_detail`] -- Surfaces internal error detail in
//!   diagnostic mode.

pub mod auth;
pub mod diagnostics;
