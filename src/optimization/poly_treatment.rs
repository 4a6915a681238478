//! Per-feature treatment allocation over polygons.
//!
//! Structurally the raster model indexed by feature id: eligibility comes
//! from an explicit per-feature action table (joined on `fid`) instead of
//! "anything but the current treatment", per-feature area replaces the
//! uniform pixel area, and costs are read directly as fixed + per-area
//! terms instead of a transition matrix lookup.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::{
    Constraint, ObjectiveFunction, OptimizationProblem, OptimizationType, SolverOutcome, Variable,
};

use super::classify;
use super::tables::TreatmentOptionRow;
use super::ModelError;

/// Current attributes of one polygon feature. NaN in any numeric
/// attribute marks the feature as carrying no usable measurement and
/// excludes it from the model.
#[derive(Debug, Clone)]
pub struct PolyFeature {
    pub fid: i64,
    pub treatment: String,
    pub value: f64,
    pub value_per_area: f64,
    pub area: f64,
}

#[derive(Debug, Clone)]
pub struct PolyTreatmentInstance {
    pub features: Vec<PolyFeature>,
    pub options: Vec<TreatmentOptionRow>,
    pub area_budget: f64,
    pub cost_budget: f64,
}

#[derive(Debug, Clone)]
pub struct PolyTreatmentModel {
    pub problem: OptimizationProblem,
    /// Per feature (in input order): (variable index, treatment index).
    pub unit_vars: Vec<Vec<(usize, usize)>>,
    /// Union of current and target treatment labels, sorted.
    pub treat_names: Vec<String>,
    /// Feature ids in decode order.
    pub fids: Vec<i64>,
}

impl PolyTreatmentModel {
    /// Dense result codes per feature:
    /// -3 unable, -2 undecided, -1 unchanged, 0.. chosen treatment index.
    pub fn decode(&self, outcome: &SolverOutcome) -> Vec<i16> {
        classify::group_selection(&self.unit_vars, outcome)
    }

    pub fn histogram(&self, codes: &[i16]) -> String {
        classify::treatment_histogram(codes, &self.treat_names)
    }

    /// Chosen treatment label per feature, `None` where nothing changed
    /// or no decision was reached.
    pub fn chosen_labels(&self, codes: &[i16]) -> Vec<Option<&str>> {
        codes
            .iter()
            .map(|&code| {
                usize::try_from(code)
                    .ok()
                    .and_then(|idx| self.treat_names.get(idx))
                    .map(String::as_str)
            })
            .collect()
    }
}

pub fn build_poly_treatment(
    instance: &PolyTreatmentInstance,
) -> Result<PolyTreatmentModel, ModelError> {
    if instance.area_budget <= 0.0 {
        return Err(ModelError::NonPositiveBudget {
            what: "area budget",
            got: instance.area_budget,
        });
    }
    if instance.cost_budget <= 0.0 {
        return Err(ModelError::NonPositiveBudget {
            what: "cost budget",
            got: instance.cost_budget,
        });
    }

    // Treatment label space: union of current and target labels.
    let treat_names: Vec<String> = instance
        .features
        .iter()
        .map(|f| f.treatment.clone())
        .chain(instance.options.iter().map(|o| o.treatment.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let label_index: HashMap<&str, usize> = treat_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    // Allowed actions per feature id; a later duplicate row wins.
    let mut allowed: HashMap<i64, BTreeMap<usize, &TreatmentOptionRow>> = HashMap::new();
    for row in &instance.options {
        let action = label_index[row.treatment.as_str()];
        allowed.entry(row.fid).or_default().insert(action, row);
    }

    let mut variables = Vec::new();
    let mut objective_coeffs = Vec::new();
    let mut objective_constant = 0.0;
    let mut unit_vars: Vec<Vec<(usize, usize)>> = vec![Vec::new(); instance.features.len()];
    let mut area_terms = Vec::new();
    let mut budget_terms = Vec::new();
    let mut exclusivity = Vec::new();

    for (unit, feat) in instance.features.iter().enumerate() {
        if feat.value.is_nan() || feat.value_per_area.is_nan() || feat.area.is_nan() {
            continue;
        }
        let Some(actions) = allowed.get(&feat.fid) else {
            continue;
        };

        let current_contribution = feat.value + feat.value_per_area * feat.area;
        for (&action, row) in actions {
            let var = variables.len();
            variables.push(Variable::binary(format!("x[{},{}]", feat.fid, row.treatment)));
            let target_contribution = row.value + row.value_per_area * feat.area;
            objective_coeffs.push(target_contribution - current_contribution);
            objective_constant += current_contribution;
            area_terms.push((var, feat.area));
            budget_terms.push((var, row.cost + row.cost_per_area * feat.area));
            unit_vars[unit].push((var, action));
        }

        if !unit_vars[unit].is_empty() {
            let group = unit_vars[unit].iter().map(|&(var, _)| (var, 1.0)).collect();
            exclusivity
                .push(Constraint::less_equal(group, 1.0).with_name(format!("at_most_one[{}]", feat.fid)));
        }
    }

    let objective = ObjectiveFunction::new(OptimizationType::Maximize, objective_coeffs)
        .with_constant(objective_constant);

    let mut problem = OptimizationProblem::new(objective)
        .with_name("polygon_treatment")
        .with_variables(variables);
    for constraint in exclusivity {
        problem = problem.add_constraint(constraint);
    }
    problem = problem
        .add_constraint(
            Constraint::less_equal(area_terms, instance.area_budget).with_name("area_capacity"),
        )
        .add_constraint(
            Constraint::less_equal(budget_terms, instance.cost_budget)
                .with_name("budget_capacity"),
        );

    Ok(PolyTreatmentModel {
        problem,
        unit_vars,
        treat_names,
        fids: instance.features.iter().map(|f| f.fid).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SolverStatus, TerminationCondition};
    use crate::optimization::classify::{TREATMENT_UNABLE, TREATMENT_UNCHANGED};
    use crate::optimization::tables::treatment_options_from_csv;

    fn feature(fid: i64, treatment: &str, value: f64, area: f64) -> PolyFeature {
        PolyFeature {
            fid,
            treatment: treatment.to_string(),
            value,
            value_per_area: 0.5,
            area,
        }
    }

    fn sample_instance() -> PolyTreatmentInstance {
        let options = treatment_options_from_csv(
            "\
fid,treatment,value,value/m2,cost,cost/m2
1,thin,8.0,1.0,100.0,0.5
1,burn,2.0,0.2,30.0,0.1
2,thin,4.0,0.4,50.0,0.25
",
        )
        .unwrap();
        PolyTreatmentInstance {
            features: vec![
                feature(1, "none", 3.0, 10.0),
                feature(2, "none", 1.0, 20.0),
                feature(3, "none", 1.0, 5.0),
            ],
            options,
            area_budget: 100.0,
            cost_budget: 500.0,
        }
    }

    #[test]
    fn label_space_is_the_sorted_union_of_current_and_target() {
        let model = build_poly_treatment(&sample_instance()).unwrap();
        assert_eq!(model.treat_names, vec!["burn", "none", "thin"]);
    }

    #[test]
    fn eligibility_comes_from_the_table_join_only() {
        let model = build_poly_treatment(&sample_instance()).unwrap();
        // fid 1 has two allowed actions, fid 2 one, fid 3 none at all.
        assert_eq!(model.unit_vars[0].len(), 2);
        assert_eq!(model.unit_vars[1].len(), 1);
        assert!(model.unit_vars[2].is_empty());
        assert_eq!(model.problem.num_variables(), 3);
    }

    #[test]
    fn cost_is_fixed_plus_per_area_times_feature_area() {
        let model = build_poly_treatment(&sample_instance()).unwrap();
        let budget = model
            .problem
            .constraints
            .iter()
            .find(|c| c.name == "budget_capacity")
            .unwrap();
        // fid 1 actions sorted by label: burn then thin.
        assert_eq!(budget.terms[0], (0, 30.0 + 0.1 * 10.0));
        assert_eq!(budget.terms[1], (1, 100.0 + 0.5 * 10.0));
        // fid 2 thin.
        assert_eq!(budget.terms[2], (2, 50.0 + 0.25 * 20.0));
        assert_eq!(budget.bound, 500.0);
    }

    #[test]
    fn objective_trades_target_against_current_contribution() {
        let model = build_poly_treatment(&sample_instance()).unwrap();
        // fid 1 current contribution: 3 + 0.5 * 10 = 8.
        // burn target: 2 + 0.2 * 10 = 4; thin target: 8 + 1 * 10 = 18.
        assert_eq!(model.problem.objective.coefficients[0], 4.0 - 8.0);
        assert_eq!(model.problem.objective.coefficients[1], 18.0 - 8.0);
        assert_eq!(
            model.problem.objective.optimization_type,
            OptimizationType::Maximize
        );
    }

    #[test]
    fn decode_reports_unable_unchanged_and_chosen_labels() {
        let model = build_poly_treatment(&sample_instance()).unwrap();
        let mut outcome = SolverOutcome::new(
            SolverStatus::Ok,
            TerminationCondition::Optimal,
            "synthetic",
        );
        // fid 1 picks thin (its second variable), fid 2 stays.
        outcome.variable_values = vec![Some(0.0), Some(1.0), Some(0.0)];
        let codes = model.decode(&outcome);
        let thin = model.treat_names.iter().position(|n| n == "thin").unwrap() as i16;
        assert_eq!(codes, vec![thin, TREATMENT_UNCHANGED, TREATMENT_UNABLE]);
        assert_eq!(
            model.chosen_labels(&codes),
            vec![Some("thin"), None, None]
        );
    }

    #[test]
    fn nan_attributes_exclude_the_feature() {
        let mut instance = sample_instance();
        instance.features[0].value = f64::NAN;
        let model = build_poly_treatment(&instance).unwrap();
        assert!(model.unit_vars[0].is_empty());
        assert_eq!(model.problem.num_variables(), 1);
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let mut instance = sample_instance();
        instance.cost_budget = 0.0;
        assert!(matches!(
            build_poly_treatment(&instance),
            Err(ModelError::NonPositiveBudget { .. })
        ));
    }
}
