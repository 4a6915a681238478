use crate::domain::{
    ConstraintType, OptimizationProblem, OptimizationType, ProgressSink, SolveStatistics,
    SolverBackend, SolverError, SolverOutcome, SolverStatus, TerminationCondition, VariableType,
};
use crate::domain::solver_service::{Result, SolverService};
use crate::solver::options::{effective_options, split_options};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(
        &self,
        problem: &OptimizationProblem,
        sink: &dyn ProgressSink,
    ) -> Result<SolverOutcome> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let num_vars = problem.num_variables();
        let num_binary = problem
            .variables
            .iter()
            .filter(|v| matches!(v.variable_type, VariableType::Binary))
            .count() as u32;

        // Build variables using good_lp
        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(num_vars);

        for var_def in problem.variables.iter() {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let var = match var_def.variable_type {
                VariableType::Binary | VariableType::Integer => {
                    vars.add(variable().integer().min(lower).max(upper))
                }
                VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
            };
            lp_variables.push(var);
        }

        // Build objective expression
        let is_maximize = problem.objective.optimization_type == OptimizationType::Maximize;
        let mut obj_expr: Expression = 0.into();

        for (i, &coeff) in problem.objective.coefficients.iter().enumerate() {
            if coeff != 0.0 {
                // good_lp minimizes, so negate for maximization
                let c = if is_maximize { -coeff } else { coeff };
                obj_expr += c * lp_variables[i];
            }
        }

        // Build constraints
        let mut lp_model = vars.minimise(obj_expr).using(coin_cbc::coin_cbc);

        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for &(idx, coeff) in &constraint.terms {
                if coeff != 0.0 {
                    lhs += coeff * lp_variables[idx];
                }
            }

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    lp_model = lp_model.with(lhs.leq(constraint.bound));
                }
                ConstraintType::Equal => {
                    lp_model = lp_model.with(lhs.eq(constraint.bound));
                }
                ConstraintType::GreaterThanOrEqual => {
                    lp_model = lp_model.with(lhs.geq(constraint.bound));
                }
            }
        }

        // Forward the options string verbatim; CBC validates the keys.
        let options = effective_options(&problem.solver.options, SolverBackend::CoinCbc);
        if let Some(options) = &options {
            for (key, value) in split_options(options) {
                lp_model.set_parameter(key, value);
            }
        }
        lp_model.set_parameter("logLevel", if problem.solver.verbose { "1" } else { "0" });

        sink.push_console(&format!(
            "cbc: {} variables ({} binary), {} constraints, options: {}",
            num_vars,
            num_binary,
            problem.constraints.len(),
            options.as_deref().unwrap_or("<none>")
        ));

        // Solve the problem
        let solution_result = lp_model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        sink.push_console(&format!("cbc: solve finished in {solve_time:.0} ms"));

        let statistics = SolveStatistics {
            solve_time_ms: solve_time,
            num_variables: num_vars as u32,
            num_constraints: problem.constraints.len() as u32,
            num_binary_vars: num_binary,
        };

        // Process result
        match solution_result {
            Ok(sol) => {
                let variable_values: Vec<Option<f64>> = lp_variables
                    .iter()
                    .map(|&var| Some(sol.value(var)))
                    .collect();

                let assignment: Vec<f64> = variable_values
                    .iter()
                    .map(|v| v.unwrap_or(0.0))
                    .collect();
                let actual_obj = problem.objective.evaluate(&assignment);

                let mut outcome = SolverOutcome::optimal(actual_obj, variable_values);
                outcome.message = format!("Optimal solution found for '{}'", problem.name);
                Ok(outcome.with_statistics(statistics))
            }
            Err(ResolutionError::Infeasible) => Ok(SolverOutcome::new(
                SolverStatus::Warning,
                TerminationCondition::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            Err(ResolutionError::Unbounded) => Ok(SolverOutcome::new(
                SolverStatus::Warning,
                TerminationCondition::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
