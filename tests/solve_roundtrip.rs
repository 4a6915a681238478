//! End-to-end solves against the linked backends.
#![cfg(feature = "server")]

use fireopt::application::{
    run_polygon_knapsack, run_polygon_treatment, run_raster_knapsack, PolygonKnapsackItem,
    RasterBandInput, RasterGridMeta,
};
use fireopt::domain::progress::{BufferSink, NullSink, SinkLevel};
use fireopt::domain::{SolverBackend, SolverOptions, SolverService, SolverSpec};
use fireopt::optimization::{
    build_raster_treatment, PolyFeature, RasterTreatmentInstance, TreatmentCostMatrix,
};
use fireopt::solver::{CoinCbcSolver, HighsSolver, SolverFactory};

fn grid(width: u32, height: u32) -> RasterGridMeta {
    RasterGridMeta {
        width,
        height,
        cellsize_x: 1.0,
        cellsize_y: 1.0,
    }
}

fn band(grid_meta: RasterGridMeta, values: Vec<f64>, nodata: Option<f64>) -> RasterBandInput {
    RasterBandInput {
        grid: grid_meta,
        values,
        nodata: nodata
            .map(fireopt::Nodata::Scalar)
            .unwrap_or(fireopt::Nodata::Absent),
    }
}

fn spec(backend: SolverBackend) -> SolverSpec {
    SolverSpec {
        backend,
        options: SolverOptions::None,
        verbose: false,
    }
}

#[test]
fn knapsack_half_capacity_reaches_the_tied_optimum() {
    // capacity = round(0.5 * 10) = 5; two optima of value 50 exist, so
    // assert the objective, not a particular selection.
    fireopt::logging::init_test();
    let sink = BufferSink::new();
    let report = run_raster_knapsack(
        Some(band(grid(4, 1), vec![10.0, 20.0, 30.0, 40.0], None)),
        Some(band(grid(4, 1), vec![1.0, 2.0, 3.0, 4.0], None)),
        0.5,
        &spec(SolverBackend::CoinCbc),
        &sink,
    )
    .unwrap();

    let objective = report.objective_value.expect("objective");
    assert!((objective - 50.0).abs() < 1e-6);
    let weights = [1.0, 2.0, 3.0, 4.0];
    let selected_weight: f64 = report
        .codes
        .iter()
        .zip(weights)
        .filter(|&(&code, _)| code == 1)
        .map(|(_, w)| w)
        .sum();
    assert!(selected_weight <= 5.0);
    assert!(sink.contains(SinkLevel::Info, "capacity bound"));
}

#[test]
fn knapsack_full_ratio_selects_every_feasible_unit() {
    let report = run_raster_knapsack(
        Some(band(grid(4, 1), vec![10.0, 20.0, -9999.0, 40.0], Some(-9999.0))),
        Some(band(grid(4, 1), vec![1.0, 1.0, 1.0, 1.0], None)),
        1.0,
        &spec(SolverBackend::CoinCbc),
        &NullSink,
    )
    .unwrap();

    assert_eq!(report.codes, vec![1, 1, -1, 1]);
}

#[test]
fn knapsack_zero_ratio_selects_nothing_with_positive_weights() {
    let report = run_raster_knapsack(
        Some(band(grid(3, 1), vec![5.0, 6.0, 7.0], None)),
        Some(band(grid(3, 1), vec![1.0, 2.0, 3.0], None)),
        0.0,
        &spec(SolverBackend::Highs),
        &NullSink,
    )
    .unwrap();

    assert!(report.codes.iter().all(|&code| code == 0));
}

#[test]
fn both_backends_agree_on_the_knapsack_optimum() {
    for backend in [SolverBackend::CoinCbc, SolverBackend::Highs] {
        let report = run_raster_knapsack(
            Some(band(grid(4, 1), vec![10.0, 20.0, 30.0, 40.0], None)),
            Some(band(grid(4, 1), vec![1.0, 2.0, 3.0, 4.0], None)),
            0.5,
            &spec(backend),
            &NullSink,
        )
        .unwrap();
        let objective = report.objective_value.expect("objective");
        assert!((objective - 50.0).abs() < 1e-6, "backend {backend}");
    }
}

#[test]
fn polygon_knapsack_skips_nan_attributes() {
    let items = vec![
        PolygonKnapsackItem {
            fid: 1,
            value: Some(10.0),
            weight: Some(1.0),
            area: 1.0,
        },
        PolygonKnapsackItem {
            fid: 2,
            value: Some(f64::NAN),
            weight: Some(1.0),
            area: 1.0,
        },
        PolygonKnapsackItem {
            fid: 3,
            value: Some(30.0),
            weight: Some(1.0),
            area: 1.0,
        },
    ];
    let report = run_polygon_knapsack(&items, 1.0, &spec(SolverBackend::CoinCbc), &NullSink)
        .unwrap();
    assert_eq!(report.codes, vec![1, -1, 1]);
}

#[test]
fn single_cell_treatment_stays_unchanged_when_cost_exceeds_budget() {
    let costs = TreatmentCostMatrix::from_csv(
        "\
,none,thin
none,0,1000.0
thin,1.0,0
",
    )
    .unwrap();
    let instance = RasterTreatmentInstance {
        width: 1,
        height: 1,
        current_treatment: vec![0.0],
        current_value: vec![5.0],
        target_value: vec![vec![5.0], vec![100.0]],
        costs,
        px_area: 1.0,
        area_budget: 10.0,
        // The only transition costs 1000, way over budget.
        cost_budget: 10.0,
        nodata: -1.0,
    };
    let model = build_raster_treatment(&instance).unwrap();
    let solver = CoinCbcSolver::new();
    let outcome = solver.solve(&model.problem, &NullSink).unwrap();

    let codes = model.decode(&outcome);
    assert_eq!(codes, vec![-1]);
    // Objective falls back to the current value contribution.
    let objective = outcome.objective_value.expect("objective");
    assert!((objective - 5.0).abs() < 1e-6);
}

#[test]
fn treatment_solution_respects_exclusivity_and_both_budgets() {
    let costs = TreatmentCostMatrix::from_csv(
        "\
,a,b,c
a,0,2.0,2.0
b,1.0,0,1.0
c,1.0,1.0,0
",
    )
    .unwrap();
    let instance = RasterTreatmentInstance {
        width: 3,
        height: 1,
        current_treatment: vec![0.0, 0.0, 0.0],
        current_value: vec![1.0, 1.0, 1.0],
        target_value: vec![vec![1.0; 3], vec![9.0; 3], vec![8.0; 3]],
        costs,
        px_area: 1.0,
        // Room for two switches by area, one by cost.
        area_budget: 2.0,
        cost_budget: 2.0,
        nodata: -1.0,
    };
    let model = build_raster_treatment(&instance).unwrap();
    let solver = HighsSolver::new();
    let outcome = solver.solve(&model.problem, &NullSink).unwrap();
    let codes = model.decode(&outcome);

    let mut area_used = 0.0;
    let mut cost_used = 0.0;
    for (cell, &code) in codes.iter().enumerate() {
        assert!(code >= -1, "cell {cell} decoded {code}");
        if code >= 0 {
            area_used += 1.0;
            cost_used += instance.costs.cost(0, code as usize);
        }
    }
    assert!(area_used <= 2.0);
    assert!(cost_used <= 2.0);
    // Exactly one switch is affordable and worthwhile.
    assert_eq!(codes.iter().filter(|&&c| c >= 0).count(), 1);
}

#[test]
fn polygon_treatment_picks_the_best_affordable_action() {
    let sink = BufferSink::new();
    let features = vec![
        PolyFeature {
            fid: 1,
            treatment: "wild".to_string(),
            value: 1.0,
            value_per_area: 0.0,
            area: 2.0,
        },
        PolyFeature {
            fid: 2,
            treatment: "wild".to_string(),
            value: 1.0,
            value_per_area: 0.0,
            area: 2.0,
        },
    ];
    let csv = "\
fid,treatment,value,value/m2,cost,cost/m2
1,thin,10.0,0.0,5.0,0.0
1,burn,3.0,0.0,1.0,0.0
2,thin,10.0,0.0,5.0,0.0
";
    let report = run_polygon_treatment(
        features,
        csv,
        10.0,
        // Two thins (5 + 5) do not fit; burn + thin (1 + 5) does.
        6.0,
        &spec(SolverBackend::CoinCbc),
        &sink,
    )
    .unwrap();

    assert_eq!(report.codes.len(), 2);
    assert_eq!(report.chosen, vec!["burn".to_string(), "thin".to_string()]);
    // Budget holds: 1 + 5 <= 6.
    assert!(sink.contains(SinkLevel::Info, "Solution histogram"));
}

#[test]
fn availability_report_lists_both_linked_backends() {
    let report = SolverFactory::availability_report();
    assert_eq!(report.len(), 2);
    assert!(report.iter().all(|solver| solver.available));
    assert!(report
        .iter()
        .any(|solver| solver.recommended_options.contains("seconds=300")));
}
