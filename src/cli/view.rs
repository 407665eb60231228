use std::path::Path;

use serde_json::json;

use crate::cli::commands::ShowArgs;
use crate::cli::{finish, open_collection};
use crate::error::GoalsError;
use crate::output;
use crate::progress::compute_progress;

pub fn run_list(json_output: bool, data_dir: Option<&Path>) -> i32 {
    finish(list_inner(json_output, data_dir), json_output)
}

pub fn run_show(args: ShowArgs, json_output: bool, data_dir: Option<&Path>) -> i32 {
    finish(show_inner(args, json_output, data_dir), json_output)
}

fn list_inner(json_output: bool, data_dir: Option<&Path>) -> Result<i32, GoalsError> {
    let collection = open_collection(data_dir);
    let current = collection.current_index();

    if json_output {
        let goals: Vec<_> = collection
            .goals()
            .iter()
            .enumerate()
            .map(|(i, g)| output::json::goal_json(g, i, i == current, compute_progress(Some(g))))
            .collect();
        output::json::print(&output::json::success(json!({
            "goals": goals,
            "current_index": current,
            "degraded": collection.is_degraded()
        })));
    } else {
        if collection.is_degraded() {
            eprintln!("Warning: goal storage is unavailable, showing the default goal");
        }
        output::text::print_goal_list(collection.goals(), current, |g| compute_progress(Some(g)));
    }
    Ok(0)
}

fn show_inner(args: ShowArgs, json_output: bool, data_dir: Option<&Path>) -> Result<i32, GoalsError> {
    let collection = open_collection(data_dir);
    let index = args.index.unwrap_or(collection.current_index());
    let goal = collection
        .goals()
        .get(index)
        .ok_or_else(|| GoalsError::index_out_of_range(index, collection.len()))?;

    let progress = compute_progress(Some(goal));
    let grid = args.grid();

    if json_output {
        output::json::print(&output::json::success(json!({
            "goal": output::json::goal_json(goal, index, index == collection.current_index(), progress),
            "grid": output::json::grid_json(&grid, progress)
        })));
    } else {
        output::text::print_goal(goal, progress);
        println!();
        print!("{}", output::text::render_grid(&grid, progress));
        println!("{}", output::text::render_bar(progress));
    }
    Ok(0)
}
