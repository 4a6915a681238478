// Mappers: convert between gRPC protobuf types and domain models
// This keeps protobuf dependencies isolated from business logic

use crate::domain::{
    progress::SinkLevel,
    value_objects::{SolverBackend, SolverOptions, SolverStatus, TerminationCondition},
    SolverSpec,
};
use crate::optimization::PolyFeature;

pub mod fire_opt {
    tonic::include_proto!("fire_opt");
}

use fire_opt as proto;

/// Convert protobuf SolverSpec to domain SolverSpec.
///
/// The options field carries a three-way protocol: empty means the
/// backend's recommended defaults, whitespace-only means "send no
/// options at all", anything else is forwarded verbatim.
pub fn solver_spec_from_proto(spec: Option<proto::SolverSpec>) -> SolverSpec {
    let Some(spec) = spec else {
        return SolverSpec::default();
    };

    let backend = match proto::SolverBackend::try_from(spec.backend) {
        Ok(proto::SolverBackend::CoinCbc) => SolverBackend::CoinCbc,
        Ok(proto::SolverBackend::Highs) => SolverBackend::Highs,
        _ => SolverBackend::Auto,
    };

    let options = if spec.options.is_empty() {
        SolverOptions::Recommended
    } else if spec.options.trim().is_empty() {
        SolverOptions::None
    } else {
        SolverOptions::Custom(spec.options.trim().to_string())
    };

    SolverSpec {
        backend,
        options,
        verbose: spec.verbose,
    }
}

pub fn backend_to_proto(backend: SolverBackend) -> proto::SolverBackend {
    match backend {
        SolverBackend::Auto => proto::SolverBackend::Auto,
        SolverBackend::CoinCbc => proto::SolverBackend::CoinCbc,
        SolverBackend::Highs => proto::SolverBackend::Highs,
    }
}

pub fn status_to_proto(status: SolverStatus) -> proto::SolverStatus {
    match status {
        SolverStatus::Ok => proto::SolverStatus::Ok,
        SolverStatus::Warning => proto::SolverStatus::Warning,
        SolverStatus::Error => proto::SolverStatus::Error,
        SolverStatus::Aborted => proto::SolverStatus::Aborted,
        SolverStatus::Unknown => proto::SolverStatus::Unknown,
    }
}

pub fn termination_to_proto(termination: TerminationCondition) -> proto::TerminationCondition {
    match termination {
        TerminationCondition::Optimal => proto::TerminationCondition::Optimal,
        TerminationCondition::Feasible => proto::TerminationCondition::Feasible,
        TerminationCondition::Infeasible => proto::TerminationCondition::Infeasible,
        TerminationCondition::Unbounded => proto::TerminationCondition::Unbounded,
        TerminationCondition::InfeasibleOrUnbounded => {
            proto::TerminationCondition::InfeasibleOrUnbounded
        }
        TerminationCondition::MaxTimeLimit => proto::TerminationCondition::MaxTimeLimit,
        TerminationCondition::IntermediateNonInteger => {
            proto::TerminationCondition::IntermediateNonInteger
        }
        TerminationCondition::Unknown => proto::TerminationCondition::Unknown,
    }
}

pub fn sink_level_to_proto(level: SinkLevel) -> proto::LogLevel {
    match level {
        SinkLevel::Info => proto::LogLevel::Info,
        SinkLevel::Warning => proto::LogLevel::Warning,
        SinkLevel::Console => proto::LogLevel::Console,
        SinkLevel::Error => proto::LogLevel::Error,
    }
}

pub fn progress_event(percent: u8, text: impl Into<String>) -> proto::SolveEvent {
    proto::SolveEvent {
        event: Some(proto::solve_event::Event::Progress(proto::Progress {
            percent: percent as u32,
            text: text.into(),
        })),
    }
}

pub fn log_event(level: SinkLevel, text: impl Into<String>) -> proto::SolveEvent {
    proto::SolveEvent {
        event: Some(proto::solve_event::Event::Log(proto::LogLine {
            level: sink_level_to_proto(level) as i32,
            text: text.into(),
        })),
    }
}

pub fn result_event(result: proto::SolveResult) -> proto::SolveEvent {
    proto::SolveEvent {
        event: Some(proto::solve_event::Event::Result(result)),
    }
}

/// Convert a protobuf polygon feature to the domain type
pub fn poly_feature_from_proto(feat: &proto::PolygonFeature) -> PolyFeature {
    PolyFeature {
        fid: feat.fid,
        treatment: feat.treatment.clone(),
        value: feat.value,
        value_per_area: feat.value_per_area,
        area: feat.area,
    }
}

#[cfg(feature = "server")]
mod server_only {
    use super::*;
    use crate::application::knapsack::{
        KnapsackReport, PolygonKnapsackItem, RasterBandInput, RasterGridMeta,
    };
    use crate::application::treatment::{PolygonTreatmentReport, TreatmentReport};
    use crate::optimization::Nodata;
    use tonic::Status;

    /// Convert a protobuf raster band to application input
    pub fn band_from_proto(
        band: Option<proto::RasterBand>,
        what: &str,
    ) -> Result<Option<RasterBandInput>, Box<Status>> {
        let Some(band) = band else {
            return Ok(None);
        };
        let grid = band
            .grid
            .ok_or_else(|| Box::new(Status::invalid_argument(format!("{what} band has no grid"))))?;
        Ok(Some(RasterBandInput {
            grid: grid_from_proto(&grid),
            values: band.values,
            nodata: band.nodata.map(Nodata::Scalar).unwrap_or_default(),
        }))
    }

    pub fn grid_from_proto(grid: &proto::RasterGrid) -> RasterGridMeta {
        RasterGridMeta {
            width: grid.width,
            height: grid.height,
            cellsize_x: grid.cellsize_x,
            cellsize_y: grid.cellsize_y,
        }
    }

    pub fn knapsack_item_from_proto(item: &proto::PolygonItem) -> PolygonKnapsackItem {
        PolygonKnapsackItem {
            fid: item.fid,
            value: item.value,
            weight: item.weight,
            area: item.area,
        }
    }

    pub fn knapsack_result_to_proto(
        report: KnapsackReport,
        width: u32,
        height: u32,
        fids: Vec<i64>,
    ) -> proto::SolveResult {
        proto::SolveResult {
            status: status_to_proto(report.status) as i32,
            termination: termination_to_proto(report.termination) as i32,
            codes: report.codes.into_iter().map(i32::from).collect(),
            treatment_names: Vec::new(),
            fids,
            chosen_treatments: Vec::new(),
            histogram: report.histogram,
            objective_value: report.objective_value,
            width,
            height,
        }
    }

    pub fn treatment_result_to_proto(
        report: TreatmentReport,
        width: u32,
        height: u32,
    ) -> proto::SolveResult {
        proto::SolveResult {
            status: status_to_proto(report.status) as i32,
            termination: termination_to_proto(report.termination) as i32,
            codes: report.codes.into_iter().map(i32::from).collect(),
            treatment_names: report.treat_names,
            fids: Vec::new(),
            chosen_treatments: Vec::new(),
            histogram: report.histogram,
            objective_value: report.objective_value,
            width,
            height,
        }
    }

    pub fn polygon_treatment_result_to_proto(
        report: PolygonTreatmentReport,
    ) -> proto::SolveResult {
        proto::SolveResult {
            status: status_to_proto(report.status) as i32,
            termination: termination_to_proto(report.termination) as i32,
            codes: report.codes.into_iter().map(i32::from).collect(),
            treatment_names: report.treat_names,
            fids: report.fids,
            chosen_treatments: report.chosen,
            histogram: report.histogram,
            objective_value: report.objective_value,
            width: 0,
            height: 0,
        }
    }
}

#[cfg(feature = "server")]
pub use server_only::*;
