//! CLI error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Project error: {0}")]
    Project(#[from] lf_project::ProjectError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] lf_sim::SimError),

    #[error("Graph error: {0}")]
    Graph(#[from] lf_graph::GraphError),

    #[error("Node key {key} is not declared in the document")]
    UnknownKey { key: u32 },
}

pub type CliResult<T> = Result<T, CliError>;
