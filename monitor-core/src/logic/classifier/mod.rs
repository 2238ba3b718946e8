//! Remote fault classification.

pub mod client;
pub mod types;

pub use client::{Classifier, ClassifierClient, ClassifierConfig};
pub use types::{ClassifierHealth, ConfidenceMap, FeatureSummary, Verdict};
