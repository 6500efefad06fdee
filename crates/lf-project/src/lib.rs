//! lf-project: circuit document format, load/save and validation.

pub mod load;
pub mod save;
pub mod schema;
pub mod validate;

use std::path::Path;

use lf_graph::{Circuit, EngineConfig};
use tracing::debug;

pub use load::{load_doc, load_into, Loaded};
pub use save::to_doc;
pub use schema::*;
pub use validate::{validate_doc, ValidationError};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Graph error: {0}")]
    Graph(#[from] lf_graph::GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_json_str(content: &str) -> ProjectResult<CircuitDoc> {
    let mut value: serde_json::Value = serde_json::from_str(content)?;
    let dropped = load::strip_json(&mut value);
    if dropped > 0 {
        debug!(dropped, "ignored derived keys");
    }
    Ok(serde_json::from_value(value)?)
}

pub fn parse_yaml_str(content: &str) -> ProjectResult<CircuitDoc> {
    let mut value: serde_yaml::Value = serde_yaml::from_str(content)?;
    let dropped = load::strip_yaml(&mut value);
    if dropped > 0 {
        debug!(dropped, "ignored derived keys");
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Read a document, choosing the format by extension (`.json`, else YAML).
pub fn read_doc(path: &Path) -> ProjectResult<CircuitDoc> {
    let content = std::fs::read_to_string(path)?;
    if is_json(path) {
        parse_json_str(&content)
    } else {
        parse_yaml_str(&content)
    }
}

/// Write a document, choosing the format by extension (`.json`, else YAML).
pub fn write_doc(path: &Path, doc: &CircuitDoc) -> ProjectResult<()> {
    validate_doc(doc)?;
    let content = if is_json(path) {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_yaml::to_string(doc)?
    };
    std::fs::write(path, content)?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

pub fn load_json_str(content: &str) -> ProjectResult<Circuit> {
    let doc = parse_json_str(content)?;
    Ok(load_doc(&doc, EngineConfig::default())?.circuit)
}

pub fn load_yaml_str(content: &str) -> ProjectResult<Circuit> {
    let doc = parse_yaml_str(content)?;
    Ok(load_doc(&doc, EngineConfig::default())?.circuit)
}

pub fn load_json(path: &Path) -> ProjectResult<Circuit> {
    let content = std::fs::read_to_string(path)?;
    load_json_str(&content)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Circuit> {
    let content = std::fs::read_to_string(path)?;
    load_yaml_str(&content)
}

pub fn save_json(path: &Path, circuit: &Circuit) -> ProjectResult<()> {
    let doc = to_doc(circuit);
    validate_doc(&doc)?;
    let content = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn save_yaml(path: &Path, circuit: &Circuit) -> ProjectResult<()> {
    let doc = to_doc(circuit);
    validate_doc(&doc)?;
    let content = serde_yaml::to_string(&doc)?;
    std::fs::write(path, content)?;
    Ok(())
}
