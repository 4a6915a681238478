// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates our domain models to the HiGHS API

use crate::domain::{
    ConstraintType, OptimizationProblem, OptimizationType, ProgressSink, SolveStatistics,
    SolverBackend, SolverError, SolverOutcome, SolverStatus, TerminationCondition, VariableType,
};
use crate::domain::solver_service::{Result, SolverService};
use crate::solver::options::{effective_options, split_options};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

// HiGHS options are typed; route the common keys to the right setter and
// fall back to parse-shape guessing for the rest.
fn apply_option(model: &mut highs::Model, key: &str, raw: &str) {
    const DOUBLE_KEYS: [&str; 6] = [
        "time_limit",
        "mip_rel_gap",
        "mip_abs_gap",
        "objective_bound",
        "primal_feasibility_tolerance",
        "dual_feasibility_tolerance",
    ];
    const INT_KEYS: [&str; 4] = [
        "threads",
        "mip_max_nodes",
        "simplex_max_iterations",
        "random_seed",
    ];
    const BOOL_KEYS: [&str; 3] = ["output_flag", "log_to_console", "mip_detect_symmetry"];

    if DOUBLE_KEYS.contains(&key) {
        if let Ok(v) = raw.parse::<f64>() {
            model.set_option(key, v);
            return;
        }
    }
    if INT_KEYS.contains(&key) {
        if let Ok(v) = raw.parse::<i32>() {
            model.set_option(key, v);
            return;
        }
    }
    if BOOL_KEYS.contains(&key) {
        if let Ok(v) = raw.parse::<bool>() {
            model.set_option(key, v);
            return;
        }
    }
    if let Ok(v) = raw.parse::<bool>() {
        model.set_option(key, v);
    } else if let Ok(v) = raw.parse::<f64>() {
        model.set_option(key, v);
    } else {
        model.set_option(key, raw);
    }
}

impl SolverService for HighsSolver {
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

        // Use HiGHS RowProblem (add variables first, then constraints)
        use highs::{HighsModelStatus, RowProblem, Sense};

        let mut pb = RowProblem::default();
        let mut vars = Vec::with_capacity(num_vars);

        for var_def in &problem.variables {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
            let obj_coeff = problem
                .objective
                .coefficients
                .get(vars.len())
                .copied()
                .unwrap_or(0.0);

            let col = match var_def.variable_type {
                VariableType::Integer | VariableType::Binary => {
                    pb.add_integer_column(obj_coeff, lower..upper)
                }
                VariableType::Continuous => pb.add_column(obj_coeff, lower..upper),
            };
            vars.push(col);
        }

        // Add constraints
        for constraint in &problem.constraints {
            let mut terms = Vec::with_capacity(constraint.terms.len());
            for &(idx, coeff) in &constraint.terms {
                if coeff != 0.0 {
                    terms.push((vars[idx], coeff));
                }
            }

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if problem.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let mut model = pb.optimise(sense);
        let options = effective_options(&problem.solver.options, SolverBackend::Highs);
        if let Some(options) = &options {
            for (key, value) in split_options(options) {
                apply_option(&mut model, key, value);
            }
        }
        model.set_option("output_flag", problem.solver.verbose);

        sink.push_console(&format!(
            "highs: {} variables ({} binary), {} constraints, options: {}",
            num_vars,
            num_binary,
            problem.constraints.len(),
            options.as_deref().unwrap_or("<none>")
        ));

        let solved = model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        sink.push_console(&format!("highs: solve finished in {solve_time:.0} ms"));

        let statistics = SolveStatistics {
            solve_time_ms: solve_time,
            num_variables: num_vars as u32,
            num_constraints: problem.constraints.len() as u32,
            num_binary_vars: num_binary,
        };

        // Process result
        match solved.status() {
            HighsModelStatus::Optimal => {
                let solution_data = solved.get_solution();
                let columns = solution_data.columns();
                let variable_values: Vec<Option<f64>> =
                    columns.iter().map(|&v| Some(v)).collect();
                let actual_obj = problem.objective.evaluate(columns);

                let mut outcome = SolverOutcome::optimal(actual_obj, variable_values);
                outcome.message = format!("Optimal solution found for '{}'", problem.name);
                Ok(outcome.with_statistics(statistics))
            }
            HighsModelStatus::Infeasible => Ok(SolverOutcome::new(
                SolverStatus::Warning,
                TerminationCondition::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            HighsModelStatus::Unbounded => Ok(SolverOutcome::new(
                SolverStatus::Warning,
                TerminationCondition::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            HighsModelStatus::UnboundedOrInfeasible => Ok(SolverOutcome::new(
                SolverStatus::Warning,
                TerminationCondition::InfeasibleOrUnbounded,
                "Problem is infeasible or unbounded",
            )
            .with_statistics(statistics)),
            HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit => {
                // A limit stop may still carry a usable incumbent; pass it
                // along so undecided cells decode instead of failing the run.
                let solution_data = solved.get_solution();
                let columns = solution_data.columns();
                if columns.len() == num_vars {
                    let variable_values: Vec<Option<f64>> =
                        columns.iter().map(|&v| Some(v)).collect();
                    let actual_obj = problem.objective.evaluate(columns);
                    let mut outcome = SolverOutcome::new(
                        SolverStatus::Aborted,
                        TerminationCondition::IntermediateNonInteger,
                        "Stopped on a limit with an intermediate incumbent",
                    );
                    outcome.objective_value = Some(actual_obj);
                    outcome.variable_values = variable_values;
                    Ok(outcome.with_statistics(statistics))
                } else {
                    Ok(SolverOutcome::new(
                        SolverStatus::Aborted,
                        TerminationCondition::MaxTimeLimit,
                        "Stopped on a limit without a usable incumbent",
                    )
                    .with_statistics(statistics))
                }
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
