//! Loading model and request documents (YAML or JSON, chosen by extension).

use crate::error::OperatorResult;
use crate::model::RandONet;
use crate::schema::{EvalRequest, RandONetDef};
use serde::de::DeserializeOwned;
use std::path::Path;

pub fn load_model(path: &Path) -> OperatorResult<RandONet> {
    let def: RandONetDef = read_document(path)?;
    let net = def.build()?;
    tracing::info!(
        path = %path.display(),
        trunk_width = net.trunk_width(),
        branch_width = net.branch_width(),
        n_out = net.n_out(),
        "loaded RandONet"
    );
    Ok(net)
}

pub fn load_request(path: &Path) -> OperatorResult<EvalRequest> {
    read_document(path)
}

fn read_document<T: DeserializeOwned>(path: &Path) -> OperatorResult<T> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}
