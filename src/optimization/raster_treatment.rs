//! Per-cell treatment allocation over a raster.
//!
//! Each feasible cell may switch to at most one candidate treatment;
//! staying as-is is the implicit default and gets no variable. Selected
//! switches consume area and budget, and the objective trades the cell's
//! current value against the per-treatment target value, both scaled by
//! the pixel area.

use crate::domain::{
    Constraint, ObjectiveFunction, OptimizationProblem, OptimizationType, SolverOutcome, Variable,
};

use super::classify;
use super::mask::Nodata;
use super::tables::TreatmentCostMatrix;
use super::ModelError;

#[derive(Debug, Clone)]
pub struct RasterTreatmentInstance {
    pub width: usize,
    pub height: usize,
    /// Current treatment index per cell, row-major.
    pub current_treatment: Vec<f64>,
    pub current_value: Vec<f64>,
    /// One band per candidate treatment, same order as the cost labels.
    pub target_value: Vec<Vec<f64>>,
    pub costs: TreatmentCostMatrix,
    /// Area represented by one cell.
    pub px_area: f64,
    pub area_budget: f64,
    pub cost_budget: f64,
    /// Shared sentinel for all three rasters.
    pub nodata: f64,
}

#[derive(Debug, Clone)]
pub struct RasterTreatmentModel {
    pub problem: OptimizationProblem,
    /// Per cell: (variable index, treatment index) pairs. Empty for cells
    /// excluded by no-data or with no candidate other than their current
    /// treatment.
    pub unit_vars: Vec<Vec<(usize, usize)>>,
    pub treat_names: Vec<String>,
}

impl RasterTreatmentModel {
    /// Dense result codes per cell:
    /// -3 unable, -2 undecided, -1 unchanged, 0.. chosen treatment index.
    pub fn decode(&self, outcome: &SolverOutcome) -> Vec<i16> {
        classify::group_selection(&self.unit_vars, outcome)
    }

    pub fn histogram(&self, codes: &[i16]) -> String {
        classify::treatment_histogram(codes, &self.treat_names)
    }
}

pub fn build_raster_treatment(
    instance: &RasterTreatmentInstance,
) -> Result<RasterTreatmentModel, ModelError> {
    let n = instance.width * instance.height;
    let t = instance.costs.len();

    for (what, len) in [
        ("current_treatment", instance.current_treatment.len()),
        ("current_value", instance.current_value.len()),
    ] {
        if len != n {
            return Err(ModelError::LengthMismatch {
                what,
                left: len,
                right: n,
            });
        }
    }
    if instance.target_value.len() != t {
        return Err(ModelError::CostTableBandMismatch {
            table: t,
            bands: instance.target_value.len(),
        });
    }
    for band in &instance.target_value {
        if band.len() != n {
            return Err(ModelError::LengthMismatch {
                what: "target_value band",
                left: band.len(),
                right: n,
            });
        }
    }
    if instance.px_area <= 0.0 {
        return Err(ModelError::NonPositiveBudget {
            what: "pixel area",
            got: instance.px_area,
        });
    }
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

    let nodata = Nodata::Scalar(instance.nodata);

    // A cell leaves the feasible map when its value or treatment reads
    // no-data, or when every target band does.
    let excluded = |cell: usize| {
        nodata.matches(instance.current_value[cell])
            || nodata.matches(instance.current_treatment[cell])
            || instance
                .target_value
                .iter()
                .all(|band| nodata.matches(band[cell]))
    };

    let mut variables = Vec::new();
    let mut objective_coeffs = Vec::new();
    let mut objective_constant = 0.0;
    let mut unit_vars: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    let mut area_terms = Vec::new();
    let mut budget_terms = Vec::new();
    let mut exclusivity = Vec::new();

    for row in 0..instance.height {
        for col in 0..instance.width {
            let cell = row * instance.width + col;
            if excluded(cell) {
                continue;
            }

            let raw = instance.current_treatment[cell];
            if raw < 0.0 || raw >= t as f64 || raw.fract() != 0.0 {
                return Err(ModelError::TreatmentLabelOutOfRange {
                    label: raw,
                    row,
                    col,
                    count: t,
                });
            }
            let current = raw as usize;
            let current_value = instance.current_value[cell];

            for tr in 0..t {
                // No variable for staying in the current treatment.
                if tr == current {
                    continue;
                }
                let var = variables.len();
                variables.push(Variable::binary(format!("x[{row},{col},{tr}]")));
                objective_coeffs
                    .push((instance.target_value[tr][cell] - current_value) * instance.px_area);
                objective_constant += current_value * instance.px_area;
                area_terms.push((var, instance.px_area));
                budget_terms.push((var, instance.costs.cost(current, tr) * instance.px_area));
                unit_vars[cell].push((var, tr));
            }

            if !unit_vars[cell].is_empty() {
                let group = unit_vars[cell].iter().map(|&(var, _)| (var, 1.0)).collect();
                exclusivity.push(
                    Constraint::less_equal(group, 1.0)
                        .with_name(format!("at_most_one[{row},{col}]")),
                );
            }
        }
    }

    let objective = ObjectiveFunction::new(OptimizationType::Maximize, objective_coeffs)
        .with_constant(objective_constant);

    let mut problem = OptimizationProblem::new(objective)
        .with_name("raster_treatment")
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

    Ok(RasterTreatmentModel {
        problem,
        unit_vars,
        treat_names: instance.costs.labels().to_vec(),
    })
}
