//! 0/1 knapsack over masked spatial units.
//!
//! Classical single-constraint binary selection: maximize the summed
//! value of selected units subject to their summed weight staying under
//! a capacity bound. Value/weight domains are arbitrary reals, so the
//! model goes to a MIP backend rather than a pseudo-polynomial DP.
//! Weights are assumed non-negative; negative weights are out of
//! contract and behavior with them is undefined.

use crate::domain::{
    Constraint, ObjectiveFunction, OptimizationProblem, SolverOutcome, Variable,
};

use super::classify;
use super::mask::{FeasibleMask, Nodata};
use super::ModelError;

/// Inputs of one knapsack run. A missing array is synthesized as all
/// ones, matching the "blank layer" convention of the callers.
#[derive(Debug, Clone, Default)]
pub struct KnapsackInstance {
    pub value: Option<Vec<f64>>,
    pub value_nodata: Nodata,
    pub weight: Option<Vec<f64>>,
    pub weight_nodata: Nodata,
    /// Capacity ratio in [0, 1]; 1 covers the full feasible weight sum.
    pub ratio: f64,
}

/// Built model plus the bookkeeping needed to decode the solution.
#[derive(Debug, Clone)]
pub struct KnapsackModel {
    pub problem: OptimizationProblem,
    pub mask: FeasibleMask,
    pub weight_sum: f64,
    pub capacity: f64,
}

impl KnapsackModel {
    /// Dense result codes per spatial unit:
    /// -2 undecided, -1 excluded, 0 not selected, 1 selected.
    pub fn decode(&self, outcome: &SolverOutcome) -> Vec<i16> {
        classify::binary_selection(&self.mask, outcome)
    }
}

pub fn build_knapsack(instance: &KnapsackInstance) -> Result<KnapsackModel, ModelError> {
    if !(0.0..=1.0).contains(&instance.ratio) {
        return Err(ModelError::InvalidRatio(instance.ratio));
    }

    let len = match (&instance.value, &instance.weight) {
        (None, None) => return Err(ModelError::NoInput),
        (Some(v), Some(w)) => {
            if v.len() != w.len() {
                return Err(ModelError::LengthMismatch {
                    what: "value/weight",
                    left: v.len(),
                    right: w.len(),
                });
            }
            v.len()
        }
        (Some(v), None) => v.len(),
        (None, Some(w)) => w.len(),
    };

    let ones = || vec![1.0; len];
    let value = instance.value.clone().unwrap_or_else(ones);
    let weight = instance.weight.clone().unwrap_or_else(ones);

    let mask = FeasibleMask::from_sources(
        len,
        &[
            (&value, &instance.value_nodata),
            (&weight, &instance.weight_nodata),
        ],
    )?;

    let feasible_value = mask.compress(&value);
    let feasible_weight = mask.compress(&weight);

    let weight_sum: f64 = feasible_weight.iter().sum();
    let capacity = (weight_sum * instance.ratio).round();

    let variables: Vec<Variable> = mask
        .feasible_indices()
        .iter()
        .map(|&unit| Variable::binary(format!("x{unit}")))
        .collect();

    let capacity_terms = feasible_weight
        .iter()
        .enumerate()
        .map(|(i, &w)| (i, w))
        .collect();

    let problem = OptimizationProblem::new(ObjectiveFunction::maximize(feasible_value))
        .with_name("knapsack")
        .with_variables(variables)
        .add_constraint(Constraint::less_equal(capacity_terms, capacity).with_name("capacity"));

    Ok(KnapsackModel {
        problem,
        mask,
        weight_sum,
        capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConstraintType, OptimizationType, SolverStatus, TerminationCondition};

    fn instance(value: Vec<f64>, weight: Vec<f64>, ratio: f64) -> KnapsackInstance {
        KnapsackInstance {
            value: Some(value),
            weight: Some(weight),
            ratio,
            ..Default::default()
        }
    }

    #[test]
    fn capacity_is_rounded_ratio_of_feasible_weight() {
        let model =
            build_knapsack(&instance(vec![10.0, 20.0, 30.0, 40.0], vec![1.0, 2.0, 3.0, 4.0], 0.5))
                .unwrap();

        assert_eq!(model.weight_sum, 10.0);
        assert_eq!(model.capacity, 5.0);
        assert_eq!(model.problem.num_variables(), 4);
        assert_eq!(model.problem.constraints.len(), 1);

        let capacity = &model.problem.constraints[0];
        assert_eq!(capacity.constraint_type, ConstraintType::LessThanOrEqual);
        assert_eq!(capacity.bound, 5.0);
        assert_eq!(capacity.num_terms(), 4);
        assert_eq!(
            model.problem.objective.optimization_type,
            OptimizationType::Maximize
        );
    }

    #[test]
    fn nodata_units_get_no_variable_and_decode_excluded() {
        let mut inst = instance(
            vec![10.0, 20.0, -9999.0, 40.0],
            vec![1.0, 1.0, 1.0, 1.0],
            1.0,
        );
        inst.value_nodata = Nodata::Scalar(-9999.0);
        let model = build_knapsack(&inst).unwrap();

        assert_eq!(model.problem.num_variables(), 3);
        // capacity covers the remaining feasible weight exactly
        assert_eq!(model.capacity, 3.0);

        let mut outcome = SolverOutcome::new(
            SolverStatus::Ok,
            TerminationCondition::Optimal,
            "synthetic",
        );
        outcome.variable_values = vec![Some(1.0); 3];
        assert_eq!(model.decode(&outcome), vec![1, 1, -1, 1]);
    }

    #[test]
    fn missing_weight_layer_is_synthesized_as_ones() {
        let inst = KnapsackInstance {
            value: Some(vec![5.0, 6.0]),
            ratio: 1.0,
            ..Default::default()
        };
        let model = build_knapsack(&inst).unwrap();
        assert_eq!(model.weight_sum, 2.0);
        assert_eq!(model.capacity, 2.0);
    }

    #[test]
    fn both_layers_missing_is_rejected() {
        let inst = KnapsackInstance {
            ratio: 0.5,
            ..Default::default()
        };
        assert!(matches!(build_knapsack(&inst), Err(ModelError::NoInput)));
    }

    #[test]
    fn ratio_outside_unit_interval_is_rejected() {
        let inst = instance(vec![1.0], vec![1.0], 1.5);
        assert!(matches!(
            build_knapsack(&inst),
            Err(ModelError::InvalidRatio(_))
        ));
    }

    #[test]
    fn mismatched_layer_lengths_are_rejected() {
        let inst = instance(vec![1.0, 2.0], vec![1.0], 0.5);
        assert!(matches!(
            build_knapsack(&inst),
            Err(ModelError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn zero_ratio_yields_zero_capacity() {
        let model = build_knapsack(&instance(vec![1.0, 2.0], vec![3.0, 4.0], 0.0)).unwrap();
        assert_eq!(model.capacity, 0.0);
    }
}
