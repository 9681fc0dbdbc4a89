//! Feature pipeline: imputation, vector assembly and linear regression
//!
//! A [`Pipeline`] is an ordered list of unfitted [`Stage`]s. Fitting runs each
//! stage against the output of the stages already fitted before it and yields
//! a [`PipelineModel`] that can transform any table with a compatible schema.

pub mod assembler;
pub mod imputer;
pub mod normal;
pub mod regression;

pub use assembler::{HandleInvalid, VectorAssembler};
pub use imputer::{ImputeStrategy, Imputer, ImputerModel};
pub use regression::{LinearRegression, LinearRegressionModel};

use polars::prelude::*;

use super::error::Result;
use super::schema::{
    ASSISTS, DRAFT_ROUND, GAMES_PLAYED, GOALS, HEIGHT, OVERALL_PICK, PLUS_MINUS, POINTS, SALARY,
    SHIFTS, TIME_ON_ICE, WEIGHT,
};

pub const FEATURES_COL: &str = "features";
pub const PREDICTION_COL: &str = "prediction";
pub const IMPUTED_DRAFT_ROUND: &str = "imp_DftRd";
pub const IMPUTED_OVERALL_PICK: &str = "imp_Ovrl";

/// Assembler inputs of the salary model, in vector order.
///
/// The label itself is part of the list, which makes the default fit exact.
/// [`FeatureConfig::exclude_label`] removes it.
pub const SALARY_FEATURES: [&str; 12] = [
    SALARY,
    HEIGHT,
    WEIGHT,
    IMPUTED_DRAFT_ROUND,
    IMPUTED_OVERALL_PICK,
    GAMES_PLAYED,
    GOALS,
    ASSISTS,
    POINTS,
    PLUS_MINUS,
    SHIFTS,
    TIME_ON_ICE,
];

/// An unfitted pipeline stage
#[derive(Debug, Clone)]
pub enum Stage {
    Imputer(Imputer),
    Assembler(VectorAssembler),
    Regression(LinearRegression),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Imputer(_) => "Imputer",
            Stage::Assembler(_) => "VectorAssembler",
            Stage::Regression(_) => "LinearRegression",
        }
    }

    pub fn fit(&self, df: &DataFrame) -> Result<FittedStage> {
        match self {
            Stage::Imputer(imputer) => Ok(FittedStage::Imputer(imputer.fit(df)?)),
            Stage::Assembler(assembler) => {
                assembler.validate(df)?;
                Ok(FittedStage::Assembler(assembler.clone()))
            }
            Stage::Regression(regression) => Ok(FittedStage::Regression(regression.fit(df)?)),
        }
    }
}

impl From<Imputer> for Stage {
    fn from(stage: Imputer) -> Self {
        Stage::Imputer(stage)
    }
}

impl From<VectorAssembler> for Stage {
    fn from(stage: VectorAssembler) -> Self {
        Stage::Assembler(stage)
    }
}

impl From<LinearRegression> for Stage {
    fn from(stage: LinearRegression) -> Self {
        Stage::Regression(stage)
    }
}

/// A fitted pipeline stage
#[derive(Debug, Clone)]
pub enum FittedStage {
    Imputer(ImputerModel),
    Assembler(VectorAssembler),
    Regression(LinearRegressionModel),
}

impl FittedStage {
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        match self {
            FittedStage::Imputer(model) => model.transform(df),
            FittedStage::Assembler(assembler) => assembler.transform(df),
            FittedStage::Regression(model) => model.transform(df),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Fit every stage in order. The table passed to stage `k` is the input
    /// transformed by the fitted stages `0..k`.
    pub fn fit(&self, df: &DataFrame) -> Result<PipelineModel> {
        let mut fitted = Vec::with_capacity(self.stages.len());
        let mut current = df.clone();

        for (i, stage) in self.stages.iter().enumerate() {
            let model = stage.fit(&current)?;
            // The last stage's output is never consumed during fitting
            if i + 1 < self.stages.len() {
                current = model.transform(&current)?;
            }
            fitted.push(model);
        }

        Ok(PipelineModel { stages: fitted })
    }
}

/// Output of [`Pipeline::fit`]. Lives in memory only unless exported.
#[derive(Debug, Clone)]
pub struct PipelineModel {
    stages: Vec<FittedStage>,
}

impl PipelineModel {
    pub fn stages(&self) -> &[FittedStage] {
        &self.stages
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut current = df.clone();
        for stage in &self.stages {
            current = stage.transform(&current)?;
        }
        Ok(current)
    }

    pub fn imputer(&self) -> Option<&ImputerModel> {
        self.stages.iter().find_map(|s| match s {
            FittedStage::Imputer(model) => Some(model),
            _ => None,
        })
    }

    pub fn assembler(&self) -> Option<&VectorAssembler> {
        self.stages.iter().find_map(|s| match s {
            FittedStage::Assembler(assembler) => Some(assembler),
            _ => None,
        })
    }

    pub fn regression(&self) -> Option<&LinearRegressionModel> {
        self.stages.iter().find_map(|s| match s {
            FittedStage::Regression(model) => Some(model),
            _ => None,
        })
    }

    /// Coefficients paired with the assembler input they weigh
    pub fn named_coefficients(&self) -> Vec<(String, f64)> {
        match (self.assembler(), self.regression()) {
            (Some(assembler), Some(model)) => assembler
                .input_cols
                .iter()
                .cloned()
                .zip(model.coefficients().iter().copied())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Knobs of the salary pipeline
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    pub impute_strategy: ImputeStrategy,
    /// Value treated as missing in draft round and overall pick
    pub missing_value: f64,
    pub handle_invalid: HandleInvalid,
    pub reg_param: f64,
    /// Drop the label from the assembler inputs
    pub exclude_label: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            impute_strategy: ImputeStrategy::Mean,
            missing_value: 0.0,
            handle_invalid: HandleInvalid::Error,
            reg_param: 0.0,
            exclude_label: false,
        }
    }
}

impl FeatureConfig {
    pub fn feature_columns(&self) -> Vec<&'static str> {
        SALARY_FEATURES
            .iter()
            .copied()
            .filter(|&c| !(self.exclude_label && c == SALARY))
            .collect()
    }
}

/// The three-stage salary model: impute draft columns, assemble, regress on Salary
pub fn salary_pipeline(config: &FeatureConfig) -> Pipeline {
    let imputer = Imputer::new(
        &[DRAFT_ROUND, OVERALL_PICK],
        &[IMPUTED_DRAFT_ROUND, IMPUTED_OVERALL_PICK],
    )
    .with_missing_value(config.missing_value)
    .with_strategy(config.impute_strategy);

    let assembler = VectorAssembler::new(&config.feature_columns(), FEATURES_COL)
        .with_handle_invalid(config.handle_invalid);

    let regression = LinearRegression::new(FEATURES_COL, SALARY)
        .with_prediction_col(PREDICTION_COL)
        .with_reg_param(config.reg_param);

    Pipeline::new(vec![imputer.into(), assembler.into(), regression.into()])
}
