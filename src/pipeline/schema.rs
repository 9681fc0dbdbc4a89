//! Fixed input schema for the player salary dataset

use std::sync::Arc;

use polars::prelude::*;

pub const SALARY: &str = "Salary";
pub const COUNTRY: &str = "Cntry";
pub const HEIGHT: &str = "Ht";
pub const WEIGHT: &str = "Wt";
pub const DRAFT_ROUND: &str = "DftRd";
pub const OVERALL_PICK: &str = "Ovrl";
pub const POSITION: &str = "Position";
pub const GAMES_PLAYED: &str = "GP";
pub const GOALS: &str = "G";
pub const ASSISTS: &str = "A";
pub const POINTS: &str = "PTS";
pub const PLUS_MINUS: &str = "+/-";
pub const SHIFTS: &str = "Shifts";
pub const TIME_ON_ICE: &str = "TOI";

/// Semantic type of a declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Double,
    Text,
}

impl ColumnKind {
    pub fn dtype(self) -> DataType {
        match self {
            ColumnKind::Double => DataType::Float64,
            ColumnKind::Text => DataType::String,
        }
    }
}

/// One `(name, type, nullable)` entry of a table schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl ColumnSpec {
    pub fn new(name: &str, kind: ColumnKind, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nullable,
        }
    }
}

/// Ordered column declarations. Order and types are fixed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Polars schema handed to the CSV reader so nothing is inferred
    pub fn to_polars(&self) -> SchemaRef {
        let schema: Schema = self
            .columns
            .iter()
            .map(|c| Field::new(c.name.as_str().into(), c.kind.dtype()))
            .collect();
        Arc::new(schema)
    }
}

/// The fourteen-column player schema. Every field is nullable.
pub fn player_schema() -> TableSchema {
    use ColumnKind::{Double, Text};

    TableSchema::new(vec![
        ColumnSpec::new(SALARY, Double, true),
        ColumnSpec::new(COUNTRY, Text, true),
        ColumnSpec::new(HEIGHT, Double, true),
        ColumnSpec::new(WEIGHT, Double, true),
        ColumnSpec::new(DRAFT_ROUND, Double, true),
        ColumnSpec::new(OVERALL_PICK, Double, true),
        ColumnSpec::new(POSITION, Text, true),
        ColumnSpec::new(GAMES_PLAYED, Double, true),
        ColumnSpec::new(GOALS, Double, true),
        ColumnSpec::new(ASSISTS, Double, true),
        ColumnSpec::new(POINTS, Double, true),
        ColumnSpec::new(PLUS_MINUS, Double, true),
        ColumnSpec::new(SHIFTS, Double, true),
        ColumnSpec::new(TIME_ON_ICE, Double, true),
    ])
}
