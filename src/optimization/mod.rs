// Model builders for the decision-optimization operations.
//
// Everything here is pure: instances go in, a solver-agnostic
// `OptimizationProblem` plus the bookkeeping needed to decode a
// `SolverOutcome` back onto spatial units comes out. No solver types
// leak in, so the builders compile and test without any backend.

pub mod classify;
pub mod knapsack;
pub mod mask;
pub mod poly_treatment;
pub mod raster_treatment;
pub mod tables;

pub use classify::*;
pub use knapsack::{build_knapsack, KnapsackInstance, KnapsackModel};
pub use mask::{FeasibleMask, Nodata};
pub use poly_treatment::{build_poly_treatment, PolyFeature, PolyTreatmentInstance, PolyTreatmentModel};
pub use raster_treatment::{build_raster_treatment, RasterTreatmentInstance, RasterTreatmentModel};
pub use tables::{treatment_options_from_csv, TreatmentCostMatrix, TreatmentOptionRow};

/// Configuration problems detected before any model is built or solved.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("no input data: at least one of value/weight must be provided")]
    NoInput,

    #[error("{what} length mismatch: {left} vs {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("rasters are not aligned: {0}")]
    GridMismatch(String),

    #[error("capacity ratio {0} outside [0, 1]")]
    InvalidRatio(f64),

    #[error("{what} must be positive, got {got}")]
    NonPositiveBudget { what: &'static str, got: f64 },

    #[error("conversion table must be square with the same index and columns")]
    CostTableNotSquare,

    #[error("conversion table has {table} treatments but target raster has {bands} bands")]
    CostTableBandMismatch { table: usize, bands: usize },

    #[error("column '{0}' not found in treatments table")]
    MissingColumn(&'static str),

    #[error("treatment index {label} at cell ({row}, {col}) outside 0..{count}")]
    TreatmentLabelOutOfRange {
        label: f64,
        row: usize,
        col: usize,
        count: usize,
    },

    #[error("malformed number '{value}' in {where_}")]
    BadNumber { where_: &'static str, value: String },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}
