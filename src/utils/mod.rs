//! Utility modules for tagtunes

pub mod auth;
pub mod parsers;
