// Example client for the polygon treatment operation.
//
// Three stands with current attributes and a per-feature target-action
// table compete for a shared area and money budget. The result lists,
// per feature, whether it keeps its current treatment or switches, and
// to what.

use futures::StreamExt;
use tonic::Request;

pub mod fire_opt {
    tonic::include_proto!("fire_opt");
}

use fire_opt::{
    decision_optimization_client::DecisionOptimizationClient, solve_event::Event, PolygonFeature,
    PolygonTreatmentRequest, SolverBackend, SolverSpec, SolverStatus, TerminationCondition,
};

const TREATMENTS_CSV: &str = "\
fid,treatment,value,value/m2,cost,cost/m2
1,thinning,40.0,0.002,900.0,0.01
1,prescribed_burn,25.0,0.001,300.0,0.004
2,thinning,55.0,0.003,1100.0,0.01
3,prescribed_burn,18.0,0.001,250.0,0.004
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = DecisionOptimizationClient::connect("http://127.0.0.1:50051").await?;

    let features = vec![
        PolygonFeature {
            fid: 1,
            treatment: "untreated".to_string(),
            value: 10.0,
            value_per_area: 0.001,
            area: 12_000.0,
        },
        PolygonFeature {
            fid: 2,
            treatment: "untreated".to_string(),
            value: 12.0,
            value_per_area: 0.001,
            area: 20_000.0,
        },
        PolygonFeature {
            fid: 3,
            treatment: "thinning".to_string(),
            value: 30.0,
            value_per_area: 0.002,
            area: 8_000.0,
        },
    ];

    let request = PolygonTreatmentRequest {
        features,
        treatments_csv: TREATMENTS_CSV.to_string(),
        area_budget: 25_000.0,
        cost_budget: 1_500.0,
        solver: Some(SolverSpec {
            backend: SolverBackend::Auto as i32,
            options: String::new(),
            verbose: false,
        }),
    };

    println!("=== Polygon treatment ===");
    let mut stream = client
        .polygon_treatment(Request::new(request))
        .await?
        .into_inner();

    while let Some(event) = stream.next().await {
        match event?.event {
            Some(Event::Progress(progress)) => println!("[{:>3}%] {}", progress.percent, progress.text),
            Some(Event::Log(line)) => println!("       {}", line.text),
            Some(Event::Result(result)) => {
                let status =
                    SolverStatus::try_from(result.status).unwrap_or(SolverStatus::Unknown);
                let termination = TerminationCondition::try_from(result.termination)
                    .unwrap_or(TerminationCondition::Unknown);
                println!("\nstatus: {status:?}, termination: {termination:?}");
                println!("{}", result.histogram);
                for ((fid, code), chosen) in result
                    .fids
                    .iter()
                    .zip(&result.codes)
                    .zip(&result.chosen_treatments)
                {
                    let decision = match *code {
                        -3 => "no feasible action".to_string(),
                        -2 => "undecided".to_string(),
                        -1 => "keep current".to_string(),
                        _ => format!("switch to {chosen}"),
                    };
                    println!("  fid {fid}: {decision}");
                }
            }
            None => {}
        }
    }

    Ok(())
}
