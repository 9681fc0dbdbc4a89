//! Report module - run summaries and model export

pub mod model_export;
pub mod summary;

pub use model_export::*;
pub use summary::*;
