// Example client for the raster knapsack operation.
//
// A 3x3 protection-value raster and a matching weight raster are sent to
// the server with a capacity ratio of 0.5; the client prints streamed
// progress and log events, then the per-pixel selection map:
// 1 selected, 0 not selected, -1 excluded (no-data), -2 undecided.

use futures::StreamExt;
use tonic::Request;

pub mod fire_opt {
    tonic::include_proto!("fire_opt");
}

use fire_opt::{
    decision_optimization_client::DecisionOptimizationClient, solve_event::Event, Empty,
    RasterBand, RasterGrid, RasterKnapsackRequest, SolverBackend, SolverSpec, SolverStatus,
    TerminationCondition,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = DecisionOptimizationClient::connect("http://127.0.0.1:50051").await?;

    println!("=== Available solvers ===");
    let solvers = client
        .get_available_solvers(Request::new(Empty {}))
        .await?
        .into_inner();
    for solver in solvers.solvers {
        println!(
            "  {} (available: {}, recommended options: {})",
            solver.name, solver.available, solver.recommended_options
        );
    }

    let grid = RasterGrid {
        width: 3,
        height: 3,
        cellsize_x: 100.0,
        cellsize_y: 100.0,
    };

    // -9999 marks a pixel with no usable measurement.
    let request = RasterKnapsackRequest {
        value: Some(RasterBand {
            grid: Some(grid.clone()),
            values: vec![12.0, 3.0, 7.0, -9999.0, 25.0, 8.0, 4.0, 18.0, 6.0],
            nodata: Some(-9999.0),
        }),
        weight: Some(RasterBand {
            grid: Some(grid),
            values: vec![1.0, 1.0, 2.0, 1.0, 3.0, 2.0, 1.0, 2.0, 1.0],
            nodata: None,
        }),
        capacity_ratio: 0.5,
        solver: Some(SolverSpec {
            backend: SolverBackend::CoinCbc as i32,
            options: String::new(),
            verbose: false,
        }),
    };

    println!("\n=== Raster knapsack (ratio 0.5) ===");
    let mut stream = client
        .raster_knapsack(Request::new(request))
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
                if let Some(objective) = result.objective_value {
                    println!("objective: {objective}");
                }
                println!("{}", result.histogram);
                for row in result.codes.chunks(result.width.max(1) as usize) {
                    println!("{row:?}");
                }
            }
            None => {}
        }
    }

    Ok(())
}
