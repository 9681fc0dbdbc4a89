//! Pipeline module - load, clean, audit, register, split and fit

pub mod catalog;
pub mod cleaner;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod missing;
pub mod schema;
pub mod split;
pub mod stages;

pub use catalog::*;
pub use cleaner::*;
pub use error::{PipelineError, Result};
pub use loader::*;
pub use metrics::*;
pub use missing::*;
pub use schema::{player_schema, ColumnKind, ColumnSpec, TableSchema};
pub use split::*;
pub use stages::{
    salary_pipeline, FeatureConfig, FittedStage, HandleInvalid, ImputeStrategy, Imputer,
    ImputerModel, LinearRegression, LinearRegressionModel, Pipeline, PipelineModel, Stage,
    VectorAssembler, FEATURES_COL, PREDICTION_COL, SALARY_FEATURES,
};
