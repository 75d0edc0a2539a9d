//! Request guards implemented as Axum extractors.
//!
//! - [`auth::AuthUser`] -- Bearer-token identity for auth and admin routes.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`client_headers::ClientCredentials`] -- IBM API-gateway client headers
//!   required by every IRAS endpoint.
//! - [`client_headers::CorpPassAccessToken`] -- The `access_token` header
//!   required by eStamp.

pub mod auth;
pub mod client_headers;
pub mod rbac;
