//! Reads `relations.csv`: one row per base relation, each bound to a
//! `tree.csv` leaf by `node_id`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use query_plan_domain::catalog::{parse_attribute_set, Attribute, Relation};
use query_plan_domain::plan::NodeId;
use query_plan_domain::PlanError;

use crate::error::ReadError;

/// One row of `relations.csv`. `enc_costs`/`dec_costs`/`size` are
/// `;`-separated integer lists aligned with `plain_attr` followed by
/// `enc_attr` (spec.md §6's `plain_attr`+`enc_attr`-aligned schema; the
/// simpler single-`attributes`-list alternative it mentions is not
/// implemented — see `SPEC_FULL.md` §6.2).
#[derive(Debug, Deserialize)]
struct RelationRow {
    name: String,
    provider: String,
    #[serde(default)]
    primary_key: String,
    #[serde(default)]
    plain_attr: String,
    #[serde(default)]
    enc_attr: String,
    #[serde(default)]
    enc_costs: String,
    #[serde(default)]
    dec_costs: String,
    #[serde(default)]
    size: String,
    node_id: usize,
}

/// Reads `relations.csv`, returning the parsed relations in row order plus
/// the `(leaf_node_id, relation_index)` bindings the caller must apply to
/// the tree once it's been read.
pub fn read_relations(path: &Path) -> Result<(Vec<Relation>, Vec<(NodeId, usize)>), ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| ReadError::Csv { path: path.to_path_buf(), source })?;

    let mut relations = Vec::new();
    let mut bindings = Vec::new();

    for (idx, result) in reader.deserialize::<RelationRow>().enumerate() {
        let row = result.map_err(|source| ReadError::Csv { path: path.to_path_buf(), source })?;
        let relation = build_relation(&row)?;
        relations.push(relation);
        bindings.push((row.node_id, idx));
    }

    Ok((relations, bindings))
}

fn build_relation(row: &RelationRow) -> Result<Relation, ReadError> {
    let plain = parse_attribute_set(&row.plain_attr);
    let enc = parse_attribute_set(&row.enc_attr);
    let pk = parse_attribute_set(&row.primary_key);

    let all: Vec<Attribute> = plain.iter().chain(enc.iter()).copied().collect();
    let enc_cost = parse_cost_vector(&row.name, "enc_costs", &row.enc_costs, &all)?;
    let dec_cost = parse_cost_vector(&row.name, "dec_costs", &row.dec_costs, &all)?;
    let size = parse_cost_vector(&row.name, "size", &row.size, &all)?;

    let relation = Relation::new(row.name.clone(), row.provider.clone().into(), pk, plain, enc, enc_cost, dec_cost, size)?;
    Ok(relation)
}

/// Parses a `;`-separated integer list aligned with `order` (`plain_attr`
/// attributes followed by `enc_attr` attributes, in that order).
fn parse_cost_vector(relation_name: &str, column: &str, raw: &str, order: &[Attribute]) -> Result<BTreeMap<Attribute, u64>, ReadError> {
    let values: Vec<&str> = if raw.trim().is_empty() { Vec::new() } else { raw.split(';').map(str::trim).collect() };
    if values.len() != order.len() {
        return Err(ReadError::Plan(PlanError::InputValidation(format!(
            "relation {relation_name:?}: {column} has {} values but plain_attr+enc_attr has {}",
            values.len(),
            order.len()
        ))));
    }

    let mut map = BTreeMap::new();
    for (attr, raw_value) in order.iter().zip(values) {
        let value: u64 = raw_value.parse().map_err(|_| {
            ReadError::Plan(PlanError::InputValidation(format!(
                "relation {relation_name:?}: {column} entry {raw_value:?} is not a non-negative integer"
            )))
        })?;
        map.insert(*attr, value);
    }
    Ok(map)
}
