//! Treatment allocation operations, raster and polygon variants.

use crate::domain::{ProgressSink, SolverSpec, SolverStatus, TerminationCondition};
use crate::optimization::{
    build_poly_treatment, build_raster_treatment, treatment_options_from_csv, ModelError,
    PolyFeature, PolyTreatmentInstance, RasterTreatmentInstance, TreatmentCostMatrix,
};

use super::knapsack::{solve_checked, RasterGridMeta};
use super::RunError;

/// Materialized result of a raster treatment run.
#[derive(Debug, Clone)]
pub struct TreatmentReport {
    /// Dense codes: -3 unable, -2 undecided, -1 unchanged, 0.. action.
    pub codes: Vec<i16>,
    pub treat_names: Vec<String>,
    pub status: SolverStatus,
    pub termination: TerminationCondition,
    pub objective_value: Option<f64>,
    pub histogram: String,
}

/// Materialized result of a polygon treatment run.
#[derive(Debug, Clone)]
pub struct PolygonTreatmentReport {
    pub codes: Vec<i16>,
    pub treat_names: Vec<String>,
    /// Chosen label per feature, empty where nothing changed or no
    /// decision was reached.
    pub chosen: Vec<String>,
    pub fids: Vec<i64>,
    pub status: SolverStatus,
    pub termination: TerminationCondition,
    pub objective_value: Option<f64>,
    pub histogram: String,
}

#[allow(clippy::too_many_arguments)]
pub fn run_raster_treatment(
    grid: &RasterGridMeta,
    current_treatment: Vec<f64>,
    current_value: Vec<f64>,
    target_value: Vec<Vec<f64>>,
    costs_csv: &str,
    nodata: f64,
    area_budget: f64,
    cost_budget: f64,
    spec: &SolverSpec,
    sink: &dyn ProgressSink,
) -> Result<TreatmentReport, RunError> {
    let costs = TreatmentCostMatrix::from_csv(costs_csv)?;
    sink.push_info(&format!("treatments: {:?}", costs.labels()));
    if costs.len() != target_value.len() {
        return Err(ModelError::CostTableBandMismatch {
            table: costs.len(),
            bands: target_value.len(),
        }
        .into());
    }

    sink.push_info(&format!(
        "width: {}, height: {}, N: {}, pixel area: {}",
        grid.width,
        grid.height,
        grid.cells(),
        grid.px_area()
    ));
    sink.set_progress(10);

    let instance = RasterTreatmentInstance {
        width: grid.width as usize,
        height: grid.height as usize,
        current_treatment,
        current_value,
        target_value,
        costs,
        px_area: grid.px_area(),
        area_budget,
        cost_budget,
        nodata,
    };
    let mut model = build_raster_treatment(&instance)?;
    model.problem.solver = spec.clone();

    sink.push_info(&format!(
        "feasible decision variables: {}",
        model.problem.num_variables()
    ));
    sink.set_progress(20);

    let outcome = solve_checked(&model.problem, sink)?;

    let codes = model.decode(&outcome);
    let histogram = model.histogram(&codes);
    sink.push_info(&histogram);
    sink.set_progress(100);

    Ok(TreatmentReport {
        codes,
        treat_names: model.treat_names,
        status: outcome.status,
        termination: outcome.termination,
        objective_value: outcome.objective_value,
        histogram,
    })
}

pub fn run_polygon_treatment(
    features: Vec<PolyFeature>,
    treatments_csv: &str,
    area_budget: f64,
    cost_budget: f64,
    spec: &SolverSpec,
    sink: &dyn ProgressSink,
) -> Result<PolygonTreatmentReport, RunError> {
    if features.is_empty() {
        return Err(ModelError::NoInput.into());
    }

    let options = treatment_options_from_csv(treatments_csv)?;
    sink.push_info(&format!(
        "polygons: {}, target actions: {}",
        features.len(),
        options.len()
    ));
    sink.set_progress(10);

    let instance = PolyTreatmentInstance {
        features,
        options,
        area_budget,
        cost_budget,
    };
    let mut model = build_poly_treatment(&instance)?;
    model.problem.solver = spec.clone();

    sink.push_info(&format!("treatments: {:?}", model.treat_names));
    sink.push_info(&format!(
        "feasible decision variables: {}",
        model.problem.num_variables()
    ));
    sink.set_progress(20);

    let outcome = solve_checked(&model.problem, sink)?;

    let codes = model.decode(&outcome);
    let histogram = model.histogram(&codes);
    sink.push_info(&histogram);
    let chosen = model
        .chosen_labels(&codes)
        .into_iter()
        .map(|label| label.unwrap_or("").to_string())
        .collect();
    sink.set_progress(100);

    Ok(PolygonTreatmentReport {
        codes,
        chosen,
        fids: model.fids,
        treat_names: model.treat_names,
        status: outcome.status,
        termination: outcome.termination,
        objective_value: outcome.objective_value,
        histogram,
    })
}
