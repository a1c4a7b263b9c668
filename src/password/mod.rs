//! Password module
//!
//! HTTP adapter around the validation engine.

pub mod dto;
pub mod handlers;
pub mod routes;
