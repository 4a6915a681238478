// Domain service interface for solving optimization problems
// Defines the contract that any solver implementation must follow (Dependency Inversion Principle)

use super::models::{OptimizationProblem, SolverOutcome};
use super::progress::ProgressSink;

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// This trait defines the contract that all solver implementations must follow.
/// It allows us to swap solver backends without changing business logic.
/// A solve never errors for infeasible/unbounded/suboptimal outcomes; those
/// are carried in the returned `SolverOutcome`. `Err` means the solver could
/// not be run at all.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem, forwarding solver chatter and phase
    /// milestones to the progress sink as they occur
    fn solve(&self, problem: &OptimizationProblem, sink: &dyn ProgressSink)
        -> Result<SolverOutcome>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<Vec<String>> {
        let mut errors = Vec::new();

        let num_vars = problem.num_variables();

        if num_vars == 0 {
            errors.push("Problem must have at least one variable".to_string());
        }

        if problem.objective.num_variables() != num_vars {
            errors.push(format!(
                "Objective has {} coefficients but problem has {} variables",
                problem.objective.num_variables(),
                num_vars
            ));
        }

        // Check constraints reference existing variables
        for (i, constraint) in problem.constraints.iter().enumerate() {
            if let Some(&(idx, _)) = constraint.terms.iter().find(|&&(idx, _)| idx >= num_vars) {
                errors.push(format!(
                    "Constraint {} ('{}') references variable {} but problem has {} variables",
                    i, constraint.name, idx, num_vars
                ));
            }
        }

        // Check variable bounds
        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(Vec::new())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Probe whether this backend can actually run. Linked backends are
    /// always available; the result is surfaced to callers as an
    /// informational warning, never a hard failure.
    fn available(&self) -> Result<()> {
        Ok(())
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
