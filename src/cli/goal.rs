use std::path::Path;

use serde_json::json;

use crate::cli::commands::{AddArgs, EditArgs};
use crate::cli::{finish, open_collection};
use crate::error::GoalsError;
use crate::models::{GoalDraft, GoalType};
use crate::output;
use crate::progress::compute_progress;

pub fn run_add(args: AddArgs, json_output: bool, data_dir: Option<&Path>) -> i32 {
    finish(add_inner(args, json_output, data_dir), json_output)
}

pub fn run_edit(args: EditArgs, json_output: bool, data_dir: Option<&Path>) -> i32 {
    finish(edit_inner(args, json_output, data_dir), json_output)
}

pub fn run_remove(index: usize, json_output: bool, data_dir: Option<&Path>) -> i32 {
    finish(remove_inner(index, json_output, data_dir), json_output)
}

pub fn run_select(index: usize, json_output: bool, data_dir: Option<&Path>) -> i32 {
    finish(select_inner(index, json_output, data_dir), json_output)
}

fn add_inner(args: AddArgs, json_output: bool, data_dir: Option<&Path>) -> Result<i32, GoalsError> {
    let draft = if args.start.is_some() || args.end.is_some() {
        GoalDraft::timeframe(args.name, args.start, args.end)
    } else {
        GoalDraft::percentage(args.name, args.progress.unwrap_or(0))
    };

    let mut collection = open_collection(data_dir);
    let goal = collection.add_goal(draft)?.clone();
    let index = collection.current_index();
    let progress = compute_progress(Some(&goal));

    if json_output {
        output::json::print(&output::json::success(json!({
            "goal": output::json::goal_json(&goal, index, true, progress)
        })));
    } else {
        println!("Added goal {index}: {} ({progress}%)", goal.name);
    }
    Ok(0)
}

/// Apply the flags given on the command line over the goal's current values.
fn merge_edit(mut draft: GoalDraft, args: EditArgs) -> GoalDraft {
    let goal_type = match args.goal_type {
        Some(t) => t.into(),
        None if args.start.is_some() || args.end.is_some() => GoalType::Timeframe,
        None if args.progress.is_some() => GoalType::Percentage,
        None => draft.goal_type,
    };
    draft.goal_type = goal_type;
    if let Some(name) = args.name {
        draft.name = name;
    }
    if args.progress.is_some() {
        draft.progress = args.progress;
    }
    if args.start.is_some() {
        draft.start_date = args.start;
    }
    if args.end.is_some() {
        draft.end_date = args.end;
    }
    draft
}

fn edit_inner(args: EditArgs, json_output: bool, data_dir: Option<&Path>) -> Result<i32, GoalsError> {
    let mut collection = open_collection(data_dir);
    let index = args.index;
    let draft = merge_edit(collection.begin_edit(index)?, args);
    let goal = collection.confirm_edit(draft)?.clone();
    let progress = compute_progress(Some(&goal));

    if json_output {
        output::json::print(&output::json::success(json!({
            "goal": output::json::goal_json(&goal, index, index == collection.current_index(), progress)
        })));
    } else {
        println!("Updated goal {index}: {} ({progress}%)", goal.name);
    }
    Ok(0)
}

fn remove_inner(index: usize, json_output: bool, data_dir: Option<&Path>) -> Result<i32, GoalsError> {
    let mut collection = open_collection(data_dir);
    let removed = collection
        .goals()
        .get(index)
        .map(|g| g.name.clone())
        .ok_or_else(|| GoalsError::index_out_of_range(index, collection.len()))?;
    collection.remove_goal(index)?;

    if json_output {
        output::json::print(&output::json::success(json!({
            "removed": removed,
            "remaining": collection.len(),
            "current_index": collection.current_index()
        })));
    } else {
        println!("Removed goal {index}: {removed}");
    }
    Ok(0)
}

fn select_inner(index: usize, json_output: bool, data_dir: Option<&Path>) -> Result<i32, GoalsError> {
    let mut collection = open_collection(data_dir);
    collection.select(index)?;
    let goal = &collection.goals()[index];

    if json_output {
        output::json::print(&output::json::success(json!({
            "current_index": index,
            "goal": output::json::goal_json(goal, index, true, compute_progress(Some(goal)))
        })));
    } else {
        println!("Selected goal {index}: {}", goal.name);
    }
    Ok(0)
}
