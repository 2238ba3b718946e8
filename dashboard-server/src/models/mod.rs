//! Request and response models

pub mod analysis;
pub mod monitor;

pub use analysis::*;
pub use monitor::*;
