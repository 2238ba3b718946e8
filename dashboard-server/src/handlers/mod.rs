//! HTTP handlers

pub mod analysis;
pub mod health;
pub mod monitor;
pub mod page;
