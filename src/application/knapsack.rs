//! Knapsack operations: raster pixels or polygon features as units.
//!
//! Orchestrates mask → model → solve → decode sequentially in the
//! calling worker, reporting through the sink at each phase. The
//! cancellation check sits between phases; a running solve is never
//! interrupted.

use crate::domain::{ProgressSink, SolverOutcome, SolverSpec, SolverStatus, TerminationCondition};
use crate::optimization::{
    build_knapsack, knapsack_histogram, KnapsackInstance, ModelError, Nodata,
};
use crate::solver::SolverFactory;

use super::RunError;

/// Raster geometry carried next to each band; both bands of a run must
/// agree on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGridMeta {
    pub width: u32,
    pub height: u32,
    pub cellsize_x: f64,
    pub cellsize_y: f64,
}

impl RasterGridMeta {
    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn px_area(&self) -> f64 {
        self.cellsize_x * self.cellsize_y
    }

    pub fn aligned_with(&self, other: &RasterGridMeta) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.cellsize_x == other.cellsize_x
            && self.cellsize_y == other.cellsize_y
    }
}

#[derive(Debug, Clone)]
pub struct RasterBandInput {
    pub grid: RasterGridMeta,
    pub values: Vec<f64>,
    pub nodata: Nodata,
}

/// One polygon feature for the knapsack. Missing value defaults to 1,
/// missing weight to the feature's area.
#[derive(Debug, Clone)]
pub struct PolygonKnapsackItem {
    pub fid: i64,
    pub value: Option<f64>,
    pub weight: Option<f64>,
    pub area: f64,
}

/// Materialized result of one knapsack run.
#[derive(Debug, Clone)]
pub struct KnapsackReport {
    /// Dense codes: -2 undecided, -1 excluded, 0 not selected, 1 selected.
    pub codes: Vec<i16>,
    pub status: SolverStatus,
    pub termination: TerminationCondition,
    pub objective_value: Option<f64>,
    pub histogram: String,
}

pub fn run_raster_knapsack(
    value: Option<RasterBandInput>,
    weight: Option<RasterBandInput>,
    ratio: f64,
    spec: &SolverSpec,
    sink: &dyn ProgressSink,
) -> Result<KnapsackReport, RunError> {
    let grid = match (&value, &weight) {
        (None, None) => return Err(ModelError::NoInput.into()),
        (Some(v), Some(w)) => {
            if !v.grid.aligned_with(&w.grid) {
                return Err(ModelError::GridMismatch(
                    "layers must have the same width, height and cellsizes".to_string(),
                )
                .into());
            }
            v.grid.clone()
        }
        (Some(v), None) => v.grid.clone(),
        (None, Some(w)) => w.grid.clone(),
    };
    let cells = grid.cells();
    for band in [&value, &weight].into_iter().flatten() {
        if band.values.len() != cells {
            return Err(ModelError::LengthMismatch {
                what: "raster band",
                left: band.values.len(),
                right: cells,
            }
            .into());
        }
    }

    // Multi-band nodata is explicitly unsupported: report and continue
    // with a vacuous contribution.
    for (name, band) in [("value", &value), ("weight", &weight)] {
        if let Some(band) = band {
            if band.nodata.is_per_band() {
                sink.report_error(&format!("{name} nodata is a per-band list, not implemented!"));
            }
        }
    }

    sink.push_info(&format!(
        "width: {}, height: {}, N: {}",
        grid.width, grid.height, cells
    ));
    for (name, band) in [("value", &value), ("weight", &weight)] {
        if let Some(band) = band {
            sink.push_info(&describe(name, &band.values, &band.nodata));
        }
    }
    sink.set_progress(10);

    let instance = KnapsackInstance {
        value: value.as_ref().map(|b| b.values.clone()),
        value_nodata: value.map(|b| b.nodata).unwrap_or_default(),
        weight: weight.as_ref().map(|b| b.values.clone()),
        weight_nodata: weight.map(|b| b.nodata).unwrap_or_default(),
        ratio,
    };
    run_knapsack_core(instance, spec, sink)
}

pub fn run_polygon_knapsack(
    items: &[PolygonKnapsackItem],
    ratio: f64,
    spec: &SolverSpec,
    sink: &dyn ProgressSink,
) -> Result<KnapsackReport, RunError> {
    if items.is_empty() {
        return Err(ModelError::NoInput.into());
    }

    if items.iter().all(|item| item.value.is_none()) {
        sink.push_warning("No value field, using 1's");
    }
    if items.iter().all(|item| item.weight.is_none()) {
        sink.push_warning("No weight field, using polygon areas");
    }

    let value: Vec<f64> = items.iter().map(|i| i.value.unwrap_or(1.0)).collect();
    let weight: Vec<f64> = items.iter().map(|i| i.weight.unwrap_or(i.area)).collect();

    sink.push_info(&format!("polygons: {}", items.len()));
    sink.set_progress(10);

    // NaN marks an invalid attribute reading on vector features.
    let instance = KnapsackInstance {
        value: Some(value),
        value_nodata: Nodata::nan(),
        weight: Some(weight),
        weight_nodata: Nodata::nan(),
        ratio,
    };
    run_knapsack_core(instance, spec, sink)
}

fn run_knapsack_core(
    instance: KnapsackInstance,
    spec: &SolverSpec,
    sink: &dyn ProgressSink,
) -> Result<KnapsackReport, RunError> {
    let mut model = build_knapsack(&instance)?;
    model.problem.solver = spec.clone();

    sink.push_info(&format!(
        "discarded units: {:.2}%",
        model.mask.excluded_fraction() * 100.0
    ));
    sink.push_info(&format!(
        "capacity bound: ratio {}, weight_sum {}, capacity {}",
        instance.ratio, model.weight_sum, model.capacity
    ));
    sink.set_progress(20);

    let outcome = solve_checked(&model.problem, sink)?;

    let codes = model.decode(&outcome);
    let histogram = knapsack_histogram(&codes);
    sink.push_info(&histogram);
    sink.set_progress(100);

    Ok(KnapsackReport {
        codes,
        status: outcome.status,
        termination: outcome.termination,
        objective_value: outcome.objective_value,
        histogram,
    })
}

/// Shared solve step: cancellation check, availability warning, the
/// status/termination gate of the error taxonomy, and the 90% milestone.
pub(crate) fn solve_checked(
    problem: &crate::domain::OptimizationProblem,
    sink: &dyn ProgressSink,
) -> Result<SolverOutcome, RunError> {
    if sink.is_canceled() {
        return Err(RunError::Canceled);
    }

    // Nothing feasible anywhere: the trivial model needs no solver and
    // decodes to all-excluded / all-unable downstream.
    if problem.num_variables() == 0 {
        sink.push_warning("No feasible units: model has no decision variables");
        sink.set_progress(90);
        let mut outcome = SolverOutcome::optimal(problem.objective.constant, Vec::new());
        outcome.message = "No decision variables; trivial solution".to_string();
        return Ok(outcome);
    }

    let solver = SolverFactory::create_solver(problem);
    if let Err(e) = solver.available() {
        sink.push_warning(&format!("Solver unavailability: {e}"));
    }
    sink.push_info(&format!("Using solver: {}", solver.name()));

    let outcome = solver.solve(problem, sink)?;
    sink.push_console(&format!(
        "Solver status: {}, termination condition: {}",
        outcome.status, outcome.termination
    ));

    if outcome.is_hard_failure() {
        sink.report_error(&format!(
            "Solver status: {}, termination condition: {}",
            outcome.status, outcome.termination
        ));
        return Err(RunError::SolverFailure {
            status: outcome.status,
            termination: outcome.termination,
        });
    }
    if outcome.is_infeasible_or_unbounded() {
        sink.report_error(&format!(
            "Optimization problem is {}. No output is generated.",
            outcome.termination
        ));
        return Err(RunError::Infeasible {
            termination: outcome.termination,
        });
    }
    if !outcome.is_proven_optimal() {
        sink.push_warning(
            "Output is generated for a non-optimal solution! Try running again with different \
             solver options or tweak the layers...",
        );
    }
    sink.set_progress(90);
    Ok(outcome)
}

fn describe(name: &str, data: &[f64], nodata: &Nodata) -> String {
    let valid: Vec<f64> = data.iter().copied().filter(|&x| !nodata.matches(x)).collect();
    if valid.is_empty() {
        return format!("{name}: no valid readings");
    }
    let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    format!(
        "{name}: {} valid readings, min {min}, max {max}, mean {mean:.4}",
        valid.len()
    )
}
