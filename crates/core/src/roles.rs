//! Well-known role name constants.
//!
//! These must match the seed data in `20260601000001_create_roles_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TALENT: &str = "talent";
pub const ROLE_PRODUCER: &str = "producer";
