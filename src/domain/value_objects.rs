// Domain value objects representing core business concepts

use std::fmt;

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Coarse process-level status of a solver run, reported alongside the
/// termination condition. A run can end with `Ok` status yet a
/// non-optimal termination (e.g. stopped on the gap tolerance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Ok,
    Warning,
    Error,
    Aborted,
    Unknown,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverStatus::Ok => write!(f, "ok"),
            SolverStatus::Warning => write!(f, "warning"),
            SolverStatus::Error => write!(f, "error"),
            SolverStatus::Aborted => write!(f, "aborted"),
            SolverStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Solver-reported reason a solve ended, distinct from the process status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCondition {
    /// Proven optimal solution
    Optimal,
    /// Feasible solution without an optimality proof
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Solver could not distinguish infeasible from unbounded
    InfeasibleOrUnbounded,
    /// Time limit reached without a usable incumbent
    MaxTimeLimit,
    /// Stopped early on an intermediate (possibly fractional) incumbent;
    /// variable values are still usable
    IntermediateNonInteger,
    /// Anything the backend could not classify
    Unknown,
}

impl TerminationCondition {
    pub fn is_infeasible_or_unbounded(&self) -> bool {
        matches!(
            self,
            TerminationCondition::Infeasible
                | TerminationCondition::Unbounded
                | TerminationCondition::InfeasibleOrUnbounded
        )
    }
}

impl fmt::Display for TerminationCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationCondition::Optimal => write!(f, "optimal"),
            TerminationCondition::Feasible => write!(f, "feasible"),
            TerminationCondition::Infeasible => write!(f, "infeasible"),
            TerminationCondition::Unbounded => write!(f, "unbounded"),
            TerminationCondition::InfeasibleOrUnbounded => write!(f, "infeasible or unbounded"),
            TerminationCondition::MaxTimeLimit => write!(f, "max time limit"),
            TerminationCondition::IntermediateNonInteger => {
                write!(f, "intermediate non-integer")
            }
            TerminationCondition::Unknown => write!(f, "unknown"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

/// How the options string for a solver run is determined.
///
/// Mirrors the caller protocol: nothing given means the backend's
/// recommended defaults, an explicitly blank string suppresses options
/// entirely, anything else is forwarded verbatim as whitespace-separated
/// `key=value` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SolverOptions {
    #[default]
    Recommended,
    None,
    Custom(String),
}
