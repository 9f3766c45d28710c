//! Reads `tree.csv`: the operator tree, before relations are bound to
//! leaves and before the synthetic `query` root is attached.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use query_plan_domain::catalog::{parse_attribute_set, parse_optional_attribute};
use query_plan_domain::plan::{Node, NodeId, OperatorKind};
use query_plan_domain::PlanError;

use crate::error::ReadError;

/// One row of `tree.csv`. Every field that can legitimately be empty
/// (`group_attr`, `print_label`, `parent`) is read as a `String` and
/// interpreted afterward — `csv`'s `Option<T>` deserialization treats a
/// present-but-empty field and a missing one the same way, which is what
/// `spec.md` §6 wants for `parent = 0` or empty meaning "no parent".
#[derive(Debug, Deserialize)]
struct TreeRow {
    #[serde(rename = "ID")]
    id: usize,
    operation: String,
    #[serde(rename = "Ap", default)]
    ap: String,
    #[serde(rename = "Ae", default)]
    ae: String,
    #[serde(rename = "As", default)]
    a_s: String,
    #[serde(default)]
    group_attr: String,
    size: u64,
    #[serde(default)]
    print_label: String,
    #[serde(default)]
    parent: String,
}

/// Reads `tree.csv` into an arena of [`Node`]s keyed by their 1-based CSV
/// `ID`, plus the id of the original (pre-synthetic-root) root node: the
/// one row whose `parent` column is `0` or empty.
pub fn read_tree(path: &Path) -> Result<(HashMap<NodeId, Node>, NodeId), ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| io_or_csv_error(path, source))?;

    let mut nodes = HashMap::new();
    let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut root = None;

    for result in reader.deserialize::<TreeRow>() {
        let row = result.map_err(|source| ReadError::Csv { path: path.to_path_buf(), source })?;
        let node = build_node(&row)?;
        let parent = parse_parent(&row.parent);

        if parent.is_none() {
            if root.is_some() {
                return Err(ReadError::Plan(PlanError::InputValidation(
                    "tree.csv: more than one row has no parent".to_string(),
                )));
            }
            root = Some(row.id);
        } else if let Some(p) = parent {
            children.entry(p).or_default().push(row.id);
        }

        parents.insert(row.id, parent);
        nodes.insert(row.id, node);
    }

    let root = root.ok_or_else(|| ReadError::Plan(PlanError::InputValidation("tree.csv: no root row found".to_string())))?;

    for (id, node) in nodes.iter_mut() {
        node.parent = parents.get(id).copied().flatten();
        node.children = children.remove(id).unwrap_or_default();
    }

    Ok((nodes, root))
}

fn build_node(row: &TreeRow) -> Result<Node, ReadError> {
    let op = OperatorKind::from_str(&row.operation)?;
    if op == OperatorKind::Query {
        return Err(ReadError::Plan(PlanError::InputValidation(format!(
            "tree.csv row {}: `query` is synthesized by the driver, not read from input",
            row.id
        ))));
    }

    let ap = parse_attribute_set(&row.ap);
    let ae = parse_attribute_set(&row.ae);
    let a_s = parse_attribute_set(&row.a_s);
    let group_attr = parse_optional_attribute(&row.group_attr)?;
    let select_multi_attr = op == OperatorKind::Selection && !ap.is_empty() && !a_s.is_empty();
    let print_label = if row.print_label.trim().is_empty() { None } else { Some(row.print_label.clone()) };

    let node = Node::new(row.id, op, ap, ae, a_s, group_attr, select_multi_attr, row.size, print_label)?;
    Ok(node)
}

fn parse_parent(s: &str) -> Option<NodeId> {
    match s.trim() {
        "" => None,
        "0" => None,
        other => other.parse::<NodeId>().ok(),
    }
}

fn io_or_csv_error(path: &Path, source: csv::Error) -> ReadError {
    match source.kind() {
        csv::ErrorKind::Io(_) => ReadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, source.to_string()),
        },
        _ => ReadError::Csv { path: path.to_path_buf(), source },
    }
}
