use crate::domain::{
    models::OptimizationProblem, solver_service::SolverService, value_objects::SolverBackend,
};
use crate::solver::options::recommended_options;
use crate::solver::{CoinCbcSolver, HighsSolver};
use std::sync::Arc;

/// Availability of one backend, collected at setup time and surfaced as
/// informational output; an unavailable backend is never a hard failure
/// because the caller can pick another.
#[derive(Debug, Clone)]
pub struct SolverAvailability {
    pub backend: SolverBackend,
    pub name: String,
    pub available: bool,
    pub detail: String,
    pub recommended_options: &'static str,
}

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver based on the problem configuration
    pub fn create_solver(problem: &OptimizationProblem) -> Arc<dyn SolverService> {
        Self::create_from_backend(problem.solver.backend)
    }

    /// Create a solver for a specific backend
    pub fn create_from_backend(backend: SolverBackend) -> Arc<dyn SolverService> {
        match backend {
            SolverBackend::Auto => Arc::new(HighsSolver::new()),
            SolverBackend::CoinCbc => Arc::new(CoinCbcSolver::new()),
            SolverBackend::Highs => Arc::new(HighsSolver::new()),
        }
    }

    /// Get the default solver (HiGHS)
    pub fn default_solver() -> Arc<dyn SolverService> {
        Arc::new(HighsSolver::new())
    }

    /// Probe every selectable backend once.
    pub fn availability_report() -> Vec<SolverAvailability> {
        [SolverBackend::CoinCbc, SolverBackend::Highs]
            .into_iter()
            .map(|backend| {
                let solver = Self::create_from_backend(backend);
                let (available, detail) = match solver.available() {
                    Ok(()) => (true, "linked".to_string()),
                    Err(e) => (false, e.to_string()),
                };
                SolverAvailability {
                    backend,
                    name: solver.name().to_string(),
                    available,
                    detail,
                    recommended_options: recommended_options(backend),
                }
            })
            .collect()
    }
}
