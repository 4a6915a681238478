// Domain layer: optimization model, outcomes, service seams
pub mod domain;

// Core model builders, masking and result classification
pub mod optimization;

// Application layer: operation orchestration and gRPC plumbing
pub mod application;

// Logging setup
pub mod logging;

// Infrastructure layer: server lifecycle
#[cfg(feature = "server")]
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverService
#[cfg(feature = "server")]
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, ObjectiveFunction, OptimizationProblem, OptimizationType,
    ProgressSink, SolverBackend, SolverError, SolverOptions, SolverOutcome, SolverService,
    SolverSpec, SolverStatus, TerminationCondition, Variable, VariableType,
};

pub use optimization::{
    build_knapsack, build_poly_treatment, build_raster_treatment, FeasibleMask, KnapsackInstance,
    KnapsackModel, ModelError, Nodata, PolyFeature, PolyTreatmentInstance, PolyTreatmentModel,
    RasterTreatmentInstance, RasterTreatmentModel, TreatmentCostMatrix,
};

pub use application::RunError;

#[cfg(feature = "server")]
pub use application::GrpcDecisionService;

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};

#[cfg(feature = "server")]
pub use solver::{CoinCbcSolver, HighsSolver, SolverFactory};
