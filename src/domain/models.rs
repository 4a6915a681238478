use super::value_objects::{
    ConstraintType, OptimizationType, SolverBackend, SolverOptions, SolverStatus,
    TerminationCondition, VariableType,
};

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Integer,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: Option<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

/// Objective function to minimize or maximize.
///
/// One coefficient per problem variable plus a constant offset. The
/// offset never reaches a solver; it is folded back in when the
/// objective value is computed from the solution.
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub coefficients: Vec<f64>,
    pub constant: f64,
}

impl ObjectiveFunction {
    pub fn new(optimization_type: OptimizationType, coefficients: Vec<f64>) -> Self {
        Self {
            optimization_type,
            coefficients,
            constant: 0.0,
        }
    }

    pub fn maximize(coefficients: Vec<f64>) -> Self {
        Self::new(OptimizationType::Maximize, coefficients)
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Objective value for a complete assignment, including the constant.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .coefficients
                .iter()
                .zip(values)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }
}

/// Linear constraint on variables, stored as sparse (variable, coefficient)
/// terms. The treatment models emit one mutual-exclusivity row per spatial
/// unit, so rows must not carry a full-width coefficient vector.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(usize, f64)>,
    pub bound: f64,
    pub name: String,
}

impl Constraint {
    pub fn new(constraint_type: ConstraintType, terms: Vec<(usize, f64)>, bound: f64) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: String::new(),
        }
    }

    pub fn less_equal(terms: Vec<(usize, f64)>, bound: f64) -> Self {
        Self::new(ConstraintType::LessThanOrEqual, terms, bound)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }
}

/// Configuration for a solver run
#[derive(Debug, Clone, Default)]
pub struct SolverSpec {
    pub backend: SolverBackend,
    pub options: SolverOptions,
    pub verbose: bool,
}

/// Complete optimization problem
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub solver: SolverSpec,
}

impl OptimizationProblem {
    pub fn new(objective: ObjectiveFunction) -> Self {
        Self {
            name: String::new(),
            objective,
            constraints: Vec::new(),
            variables: Vec::new(),
            solver: SolverSpec::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_solver(mut self, solver: SolverSpec) -> Self {
        self.solver = solver;
        self
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn is_mixed_integer(&self) -> bool {
        self.num_integer_variables() > 0
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolveStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_binary_vars: u32,
}

/// Outcome of one solver invocation: the (status, termination condition)
/// pair plus per-variable values. A `None` value means the solver never
/// assigned that variable (time limit, partial incumbent) and decodes to
/// the `undecided` result code downstream.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub status: SolverStatus,
    pub termination: TerminationCondition,
    pub objective_value: Option<f64>,
    pub variable_values: Vec<Option<f64>>,
    pub message: String,
    pub statistics: SolveStatistics,
}

impl SolverOutcome {
    pub fn new(
        status: SolverStatus,
        termination: TerminationCondition,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            termination,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolveStatistics::default(),
        }
    }

    pub fn optimal(objective_value: f64, variable_values: Vec<Option<f64>>) -> Self {
        Self {
            status: SolverStatus::Ok,
            termination: TerminationCondition::Optimal,
            objective_value: Some(objective_value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolveStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolveStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    /// Error/aborted/unknown runs are hard failures unless the solver
    /// stopped on an intermediate incumbent, which is still usable.
    pub fn is_hard_failure(&self) -> bool {
        matches!(
            self.status,
            SolverStatus::Error | SolverStatus::Aborted | SolverStatus::Unknown
        ) && self.termination != TerminationCondition::IntermediateNonInteger
    }

    pub fn is_infeasible_or_unbounded(&self) -> bool {
        self.termination.is_infeasible_or_unbounded()
    }

    pub fn is_proven_optimal(&self) -> bool {
        self.termination == TerminationCondition::Optimal
    }
}
