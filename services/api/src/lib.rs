//! services/api/src/lib.rs
//!
//! The HTTP service around `fake_data_core`: configuration, adapters for the
//! core ports, and the Axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
