//! Screen sessions, one domain per screen family.

pub mod auth;
pub mod chat;
pub mod jobs;
pub mod profile;
