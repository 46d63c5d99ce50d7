//! HTTP request handlers

pub mod analyses;
pub mod health;
