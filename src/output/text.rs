use crate::models::{Goal, GoalKind};
use crate::progress::DotGrid;

const FILLED: char = '●';
const EMPTY: char = '○';
const BAR_WIDTH: usize = 30;

pub fn print_goal(goal: &Goal, progress: u8) {
    println!("Goal: {}", goal.name);
    println!("  Type: {}", goal.goal_type().as_str());
    if let GoalKind::Timeframe { start_date, end_date } = &goal.kind {
        let fmt = |d: &Option<chrono::DateTime<chrono::Utc>>| {
            d.map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "unset".into())
        };
        println!("  Start: {}", fmt(start_date));
        println!("  End: {}", fmt(end_date));
    }
    println!("  Progress: {progress}%");
}

pub fn print_goal_list(goals: &[Goal], current: usize, progress: impl Fn(&Goal) -> u8) {
    for (i, goal) in goals.iter().enumerate() {
        let marker = if i == current { '*' } else { ' ' };
        println!(
            "{marker} {i}: {} [{}] {}%",
            goal.name,
            goal.goal_type().as_str(),
            progress(goal)
        );
    }
}

pub fn render_grid(grid: &DotGrid, progress: u8) -> String {
    let filled = grid.filled(progress);
    let columns = u64::from(grid.columns);
    let mut out = String::new();
    for row in 0..u64::from(grid.rows) {
        let line: String = (0..columns)
            .map(|col| if row * columns + col < filled { FILLED } else { EMPTY })
            .collect();
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_bar(progress: u8) -> String {
    let done = BAR_WIDTH * usize::from(progress.min(100)) / 100;
    format!(
        "[{}{}] {progress}%",
        "#".repeat(done),
        "-".repeat(BAR_WIDTH - done)
    )
}
