//! Model construction and decoding flows that need no live solver.

use fireopt::domain::{SolverOutcome, SolverStatus, TerminationCondition};
use fireopt::optimization::{
    build_knapsack, build_poly_treatment, build_raster_treatment, knapsack_histogram,
    treatment_options_from_csv, KnapsackInstance, Nodata, PolyFeature, PolyTreatmentInstance,
    RasterTreatmentInstance, TreatmentCostMatrix,
};

fn synthetic_outcome(values: Vec<Option<f64>>) -> SolverOutcome {
    let mut outcome = SolverOutcome::new(
        SolverStatus::Ok,
        TerminationCondition::Optimal,
        "synthetic",
    );
    outcome.variable_values = values;
    outcome
}

#[test]
fn knapsack_capacity_follows_the_rounded_ratio() {
    let model = build_knapsack(&KnapsackInstance {
        value: Some(vec![10.0, 20.0, 30.0, 40.0]),
        weight: Some(vec![1.0, 2.0, 3.0, 4.0]),
        ratio: 0.5,
        ..Default::default()
    })
    .unwrap();

    assert_eq!(model.capacity, (0.5f64 * 10.0).round());
    assert_eq!(model.problem.constraints[0].bound, 5.0);
}

#[test]
fn every_unit_receives_exactly_one_code() {
    let mut instance = KnapsackInstance {
        value: Some(vec![10.0, -9999.0, 30.0, 40.0, -9999.0]),
        weight: Some(vec![1.0, 1.0, 1.0, 1.0, 1.0]),
        ratio: 1.0,
        ..Default::default()
    };
    instance.value_nodata = Nodata::Scalar(-9999.0);
    let model = build_knapsack(&instance).unwrap();

    let codes = model.decode(&synthetic_outcome(vec![Some(1.0), Some(0.0), None]));
    assert_eq!(codes.len(), 5);
    // Excluded units carry the exclusion code and nothing else; feasible
    // units never carry it.
    assert_eq!(codes[1], -1);
    assert_eq!(codes[4], -1);
    assert_eq!(codes[0], 1);
    assert_eq!(codes[2], 0);
    assert_eq!(codes[3], -2);

    let histogram = knapsack_histogram(&codes);
    assert!(histogram.contains("selected: 1"));
    assert!(histogram.contains("undecided: 1"));
}

#[test]
fn excluded_unit_scenario_with_full_capacity() {
    // value[2] = nodata, ratio = 1: the other three are all selectable.
    let mut instance = KnapsackInstance {
        value: Some(vec![10.0, 20.0, -9999.0, 40.0]),
        weight: Some(vec![1.0, 1.0, 1.0, 1.0]),
        ratio: 1.0,
        ..Default::default()
    };
    instance.value_nodata = Nodata::Scalar(-9999.0);
    let model = build_knapsack(&instance).unwrap();
    assert_eq!(model.capacity, 3.0);

    let codes = model.decode(&synthetic_outcome(vec![Some(1.0); 3]));
    assert_eq!(codes, vec![1, 1, -1, 1]);
}

#[test]
fn raster_treatment_constraints_share_the_variable_space() {
    let costs = TreatmentCostMatrix::from_csv(
        "\
,none,thin,burn
none,0,5.0,2.0
thin,1.0,0,3.0
burn,1.5,2.5,0
",
    )
    .unwrap();
    let instance = RasterTreatmentInstance {
        width: 2,
        height: 2,
        current_treatment: vec![0.0, 1.0, 2.0, -1.0],
        current_value: vec![1.0, 2.0, 3.0, 4.0],
        target_value: vec![vec![1.0; 4], vec![2.0; 4], vec![3.0; 4]],
        costs,
        px_area: 100.0,
        area_budget: 250.0,
        cost_budget: 1000.0,
        nodata: -1.0,
    };
    let model = build_raster_treatment(&instance).unwrap();

    // Three feasible cells (the fourth has a no-data treatment), two
    // candidates each.
    assert_eq!(model.problem.num_variables(), 6);
    let groups: Vec<_> = model
        .problem
        .constraints
        .iter()
        .filter(|c| c.name.starts_with("at_most_one"))
        .collect();
    assert_eq!(groups.len(), 3);
    for group in groups {
        assert_eq!(group.num_terms(), 2);
        assert_eq!(group.bound, 1.0);
        assert!(group.terms.iter().all(|&(_, coeff)| coeff == 1.0));
    }

    let area = model
        .problem
        .constraints
        .iter()
        .find(|c| c.name == "area_capacity")
        .unwrap();
    assert_eq!(area.num_terms(), 6);
    assert!(area.terms.iter().all(|&(_, coeff)| coeff == 100.0));
    assert_eq!(area.bound, 250.0);

    // The excluded cell decodes to unable, never to a treatment.
    let codes = model.decode(&synthetic_outcome(vec![Some(0.0); 6]));
    assert_eq!(codes[3], -3);
    assert_eq!(codes[..3], [-1, -1, -1]);
}

#[test]
fn polygon_treatment_decodes_actions_and_labels() {
    let options = treatment_options_from_csv(
        "\
fid,treatment,value,value/m2,cost,cost/m2
10,clear,9.0,0.0,10.0,0.0
20,clear,1.0,0.0,10.0,0.0
",
    )
    .unwrap();
    let instance = PolyTreatmentInstance {
        features: vec![
            PolyFeature {
                fid: 10,
                treatment: "wild".to_string(),
                value: 1.0,
                value_per_area: 0.0,
                area: 4.0,
            },
            PolyFeature {
                fid: 20,
                treatment: "wild".to_string(),
                value: 2.0,
                value_per_area: 0.0,
                area: 6.0,
            },
        ],
        options,
        area_budget: 5.0,
        cost_budget: 100.0,
    };
    let model = build_poly_treatment(&instance).unwrap();
    assert_eq!(model.treat_names, vec!["clear", "wild"]);

    // Feature 10 switches, feature 20 stays.
    let codes = model.decode(&synthetic_outcome(vec![Some(1.0), Some(0.0)]));
    let clear = 0i16;
    assert_eq!(codes, vec![clear, -1]);
    assert_eq!(model.chosen_labels(&codes), vec![Some("clear"), None]);

    let histogram = model.histogram(&codes);
    assert!(histogram.contains("clear: 1"));
    assert!(histogram.contains("unchanged: 1"));
}
