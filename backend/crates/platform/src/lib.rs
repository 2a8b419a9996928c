//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id)
//! - Client IP derivation from proxy headers
//! - Sliding-window rate limiting

pub mod client;
pub mod password;
pub mod rate_limit;
