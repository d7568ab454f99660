pub mod config;
pub mod error;
pub mod evaluate;
pub mod feature;
pub mod idx;
pub mod knn;
pub mod mnist;

pub use error::{AppError, ErrorCode, Errors, Result};
pub use feature::{FeatureVector, Label, LabeledFeatures};
