//! Well-known role name constants.
//!
//! These must match the `role` check constraint in the `users` migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
