//! CSV condition-rule source.
//!
//! # CSV format
//!
//! One row per affected directed edge.  Rows sharing a `name` form one
//! rule and must agree on `description` and `penalty_factor`.
//!
//! ```csv
//! name,description,penalty_factor,u,v
//! flood,Flooded underpass,8.0,1001,1002
//! flood,Flooded underpass,8.0,1002,1001
//! works,Lane closure on Av. Roberto Silveira,1.5,2040,2041
//! ```
//!
//! `u`/`v` are node OSM ids.  Rules are returned in first-appearance order.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use pf_graph::ConditionRule;

use crate::{SourceError, SourceResult};

#[derive(Deserialize)]
struct ConditionRecord {
    name:           String,
    description:    String,
    penalty_factor: f64,
    u:              i64,
    v:              i64,
}

struct PendingRule {
    description:    String,
    penalty_factor: f64,
    edges:          Vec<(i64, i64)>,
}

pub fn load_conditions_csv(path: &Path) -> SourceResult<Vec<ConditionRule>> {
    let file = std::fs::File::open(path)?;
    load_conditions_reader(file)
}

/// Like [`load_conditions_csv`] but accepts any `Read` source.
pub fn load_conditions_reader<R: Read>(reader: R) -> SourceResult<Vec<ConditionRule>> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, PendingRule> = HashMap::new();

    for row in csv::Reader::from_reader(reader).deserialize::<ConditionRecord>() {
        let row = row.map_err(|e| SourceError::Parse(e.to_string()))?;
        match by_name.get_mut(&row.name) {
            Some(rule) => {
                if rule.penalty_factor != row.penalty_factor || rule.description != row.description {
                    return Err(SourceError::Parse(format!(
                        "condition {:?} has conflicting description or penalty factor",
                        row.name
                    )));
                }
                rule.edges.push((row.u, row.v));
            }
            None => {
                order.push(row.name.clone());
                by_name.insert(row.name, PendingRule {
                    description:    row.description,
                    penalty_factor: row.penalty_factor,
                    edges:          vec![(row.u, row.v)],
                });
            }
        }
    }

    order
        .into_iter()
        .filter_map(|name| by_name.remove(&name).map(|rule| (name, rule)))
        .map(|(name, rule)| {
            ConditionRule::new(name, rule.description, rule.penalty_factor, rule.edges)
                .map_err(SourceError::from)
        })
        .collect()
}
