//! Database module for tagtunes
//!
//! This module handles all database operations using SQLx with SQLite.

mod engine;
mod migrations;
pub mod tables;

pub use engine::DbEngine;
pub use tables::*;
