//! gRPC service implementation.
//!
//! Each solve runs on a blocking worker and streams progress, log and
//! result events back to the caller; the main async loop never blocks on
//! a MIP solve.

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

use crate::application::mappers::{self, fire_opt as proto};
use crate::application::{events::ChannelSink, knapsack, treatment, RunError};
use crate::solver::SolverFactory;

pub struct GrpcDecisionService;

impl GrpcDecisionService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrpcDecisionService {
    fn default() -> Self {
        Self::new()
    }
}

type EventStream = ReceiverStream<Result<proto::SolveEvent, Status>>;

fn run_error_to_status(err: RunError) -> Status {
    match &err {
        RunError::Model(e) => Status::invalid_argument(e.to_string()),
        RunError::Solver(crate::domain::SolverError::SolverNotAvailable(msg)) => {
            Status::failed_precondition(format!("Solver not available: {msg}"))
        }
        RunError::Solver(e) => Status::internal(e.to_string()),
        RunError::SolverFailure { .. } => Status::aborted(err.to_string()),
        RunError::Infeasible { .. } => Status::failed_precondition(err.to_string()),
        RunError::Canceled => Status::cancelled(err.to_string()),
    }
}

/// Spawn `work` on a blocking worker wired to a fresh event channel and
/// hand the receiving end back as the response stream.
fn stream_solve<F>(work: F) -> Response<EventStream>
where
    F: FnOnce(&ChannelSink) -> Result<proto::SolveResult, Status> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(64);
    tokio::task::spawn_blocking(move || {
        let sink = ChannelSink::new(tx.clone());
        match work(&sink) {
            Ok(result) => {
                let _ = tx.blocking_send(Ok(mappers::result_event(result)));
            }
            Err(status) => {
                let _ = tx.blocking_send(Err(status));
            }
        }
    });
    Response::new(ReceiverStream::new(rx))
}

#[tonic::async_trait]
impl proto::decision_optimization_server::DecisionOptimization for GrpcDecisionService {
    type RasterKnapsackStream = EventStream;
    type PolygonKnapsackStream = EventStream;
    type RasterTreatmentStream = EventStream;
    type PolygonTreatmentStream = EventStream;

    async fn raster_knapsack(
        &self,
        request: Request<proto::RasterKnapsackRequest>,
    ) -> Result<Response<Self::RasterKnapsackStream>, Status> {
        let req = request.into_inner();
        Ok(stream_solve(move |sink| {
            let value = mappers::band_from_proto(req.value, "value").map_err(|e| *e)?;
            let weight = mappers::band_from_proto(req.weight, "weight").map_err(|e| *e)?;
            let (width, height) = [&value, &weight]
                .into_iter()
                .flatten()
                .map(|band| (band.grid.width, band.grid.height))
                .next()
                .unwrap_or((0, 0));
            let spec = mappers::solver_spec_from_proto(req.solver);

            let report =
                knapsack::run_raster_knapsack(value, weight, req.capacity_ratio, &spec, sink)
                    .map_err(run_error_to_status)?;
            Ok(mappers::knapsack_result_to_proto(
                report,
                width,
                height,
                Vec::new(),
            ))
        }))
    }

    async fn polygon_knapsack(
        &self,
        request: Request<proto::PolygonKnapsackRequest>,
    ) -> Result<Response<Self::PolygonKnapsackStream>, Status> {
        let req = request.into_inner();
        Ok(stream_solve(move |sink| {
            let items: Vec<_> = req
                .items
                .iter()
                .map(mappers::knapsack_item_from_proto)
                .collect();
            let fids = items.iter().map(|i| i.fid).collect();
            let spec = mappers::solver_spec_from_proto(req.solver);

            let report = knapsack::run_polygon_knapsack(&items, req.capacity_ratio, &spec, sink)
                .map_err(run_error_to_status)?;
            Ok(mappers::knapsack_result_to_proto(report, 0, 0, fids))
        }))
    }

    async fn raster_treatment(
        &self,
        request: Request<proto::RasterTreatmentRequest>,
    ) -> Result<Response<Self::RasterTreatmentStream>, Status> {
        let req = request.into_inner();
        Ok(stream_solve(move |sink| {
            let grid = req
                .grid
                .as_ref()
                .ok_or_else(|| Status::invalid_argument("request has no grid"))?;
            let grid = mappers::grid_from_proto(grid);
            let target_value: Vec<Vec<f64>> =
                req.target_value.into_iter().map(|band| band.values).collect();
            let spec = mappers::solver_spec_from_proto(req.solver);

            let report = treatment::run_raster_treatment(
                &grid,
                req.current_treatment,
                req.current_value,
                target_value,
                &req.treatment_costs_csv,
                req.nodata,
                req.area_budget,
                req.cost_budget,
                &spec,
                sink,
            )
            .map_err(run_error_to_status)?;
            Ok(mappers::treatment_result_to_proto(
                report,
                grid.width,
                grid.height,
            ))
        }))
    }

    async fn polygon_treatment(
        &self,
        request: Request<proto::PolygonTreatmentRequest>,
    ) -> Result<Response<Self::PolygonTreatmentStream>, Status> {
        let req = request.into_inner();
        Ok(stream_solve(move |sink| {
            let features: Vec<_> = req
                .features
                .iter()
                .map(mappers::poly_feature_from_proto)
                .collect();
            let spec = mappers::solver_spec_from_proto(req.solver);

            let report = treatment::run_polygon_treatment(
                features,
                &req.treatments_csv,
                req.area_budget,
                req.cost_budget,
                &spec,
                sink,
            )
            .map_err(run_error_to_status)?;
            Ok(mappers::polygon_treatment_result_to_proto(report))
        }))
    }

    async fn get_available_solvers(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::AvailableSolvers>, Status> {
        let solvers = SolverFactory::availability_report()
            .into_iter()
            .map(|report| proto::SolverInfo {
                backend: mappers::backend_to_proto(report.backend) as i32,
                name: report.name,
                available: report.available,
                detail: report.detail,
                recommended_options: report.recommended_options.to_string(),
                supports_mip: true,
            })
            .collect();

        Ok(Response::new(proto::AvailableSolvers { solvers }))
    }
}
