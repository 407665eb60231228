use serde_json::{json, Value};

use crate::error::GoalsError;
use crate::models::Goal;
use crate::progress::DotGrid;

pub fn print(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(_) => println!("{value}"),
    }
}

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &GoalsError) -> Value {
    let mut body = json!({
        "code": err.code.as_str(),
        "message": err.message
    });
    if !err.field_errors.is_empty() {
        body["fields"] = json!(err.field_errors);
    }
    json!({
        "success": false,
        "error": body
    })
}

/// The goal's stored fields plus its position and current progress.
pub fn goal_json(goal: &Goal, index: usize, selected: bool, progress: u8) -> Value {
    let mut v = json!(goal);
    v["index"] = json!(index);
    v["selected"] = json!(selected);
    v["percent"] = json!(progress);
    v
}

pub fn grid_json(grid: &DotGrid, progress: u8) -> Value {
    json!({
        "columns": grid.columns,
        "rows": grid.rows,
        "total": grid.total(),
        "filled": grid.filled(progress)
    })
}
