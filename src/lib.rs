//! Puckline: Salary Regression Pipeline
//!
//! A library for loading player statistics with a fixed schema, auditing
//! nulls, registering session views, splitting, and fitting an
//! impute → assemble → linear regression pipeline.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
