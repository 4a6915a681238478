// Infrastructure: server setup and configuration

use std::net::SocketAddr;
use tonic::transport::Server;

use crate::application::mappers::fire_opt::decision_optimization_server::DecisionOptimizationServer;
use crate::application::GrpcDecisionService;
use crate::solver::SolverFactory;

pub struct ServerConfig {
    pub address: SocketAddr,
}

impl ServerConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self { address }
    }
}

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = GrpcDecisionService::new();

    for solver in SolverFactory::availability_report() {
        tracing::info!(
            solver = %solver.name,
            available = solver.available,
            options = solver.recommended_options,
            "solver backend"
        );
    }
    tracing::info!(address = %config.address, "fireopt decision optimization server listening");

    Server::builder()
        .add_service(DecisionOptimizationServer::new(service))
        .serve(config.address)
        .await?;

    Ok(())
}
