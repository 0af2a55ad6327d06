//! Domain core for the talentdeck platform.
//!
//! Pure types and logic with no I/O: error taxonomy, role names, the media
//! access policy, and object-key resolution for stored media.

pub mod error;
pub mod media_access;
pub mod media_keys;
pub mod roles;
pub mod types;
