// Application layer: operation orchestration and the gRPC service

pub mod mappers;

#[cfg(feature = "server")]
pub mod events;
#[cfg(feature = "server")]
pub mod grpc_service;
#[cfg(feature = "server")]
pub mod knapsack;
#[cfg(feature = "server")]
pub mod treatment;

#[cfg(feature = "server")]
pub use grpc_service::GrpcDecisionService;
#[cfg(feature = "server")]
pub use knapsack::{
    run_polygon_knapsack, run_raster_knapsack, KnapsackReport, PolygonKnapsackItem,
    RasterBandInput, RasterGridMeta,
};
#[cfg(feature = "server")]
pub use treatment::{
    run_polygon_treatment, run_raster_treatment, PolygonTreatmentReport, TreatmentReport,
};

use crate::domain::{SolverError, SolverStatus, TerminationCondition};
use crate::optimization::ModelError;

/// Everything that can stop an operation from materializing output.
/// Infeasible/unbounded and hard solver failures are surfaced once with
/// enough context to adjust parameters and re-run; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("solver failed: status {status}, termination condition {termination}")]
    SolverFailure {
        status: SolverStatus,
        termination: TerminationCondition,
    },

    #[error("optimization problem is {termination}; no output is generated")]
    Infeasible { termination: TerminationCondition },

    #[error("operation canceled")]
    Canceled,
}
