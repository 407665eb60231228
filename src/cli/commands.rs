use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::models::GoalType;
use crate::progress::DotGrid;

const VERSION: &str = env!("GIT_VERSION");

/// Largest grid side accepted on the command line.
pub const MAX_GRID_SIDE: u32 = 200;

#[derive(Parser)]
#[command(
    name = "goaldots",
    version = VERSION,
    about = "Track goals as a grid of dots",
    after_help = "\
NOTE:
  Goals are stored in <data-dir>/goals.db, the selected goal in <data-dir>/settings.json.
  The data dir defaults to the platform data directory (e.g. ~/.local/share/goaldots).

GOAL TYPES:
  percentage  progress is set by hand (0-100)
  timeframe   progress is the share of time elapsed between --start and --end

DATES:
  YYYY-MM-DD (midnight UTC) or RFC 3339, e.g. 2025-06-01T09:00:00Z

INDEXES:
  Goals are addressed by their 0-based position as shown by `goaldots list`.

EXIT CODES:
  0  Success
  1  Error (validation, storage, bad index)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding goals.db and settings.json
    #[arg(long, global = true, env = "GOALDOTS_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List goals with their progress
    List,

    /// Show a goal as a dot grid (defaults to the selected goal)
    Show(ShowArgs),

    /// Add a goal and select it
    #[command(after_help = "\
NOTE:
  Without --start/--end the goal is a percentage goal.
  With either one it is a timeframe goal and both are required.")]
    Add(AddArgs),

    /// Replace a goal's fields, keeping its position
    Edit(EditArgs),

    /// Remove a goal
    #[command(after_help = "\
NOTE:
  Removing the last goal leaves a fresh \"New Goal\" in its place.")]
    Remove {
        /// Goal index
        index: usize,
    },

    /// Select the goal shown by default
    Select {
        /// Goal index
        index: usize,
    },
}

#[derive(Args)]
pub struct ShowArgs {
    /// Goal index
    pub index: Option<usize>,

    /// Dots per row
    #[arg(long, default_value = "20", value_parser = grid_side())]
    pub columns: u32,

    /// Rows of dots
    #[arg(long, default_value = "5", value_parser = grid_side())]
    pub rows: u32,

    /// Fit the grid into this many characters across, one dot per character
    #[arg(long, requires = "height", conflicts_with_all = ["columns", "rows"], value_parser = grid_side())]
    pub width: Option<u32>,

    /// Fit the grid into this many lines
    #[arg(long, requires = "width", value_parser = grid_side())]
    pub height: Option<u32>,
}

impl ShowArgs {
    pub fn grid(&self) -> DotGrid {
        match (self.width, self.height) {
            (Some(width), Some(height)) => DotGrid::fit(f64::from(width), f64::from(height), 1.0),
            _ => DotGrid::new(self.columns, self.rows),
        }
    }
}

fn grid_side() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(MAX_GRID_SIDE))
}

#[derive(Args)]
pub struct AddArgs {
    /// Goal name (at most 50 characters)
    pub name: String,

    /// Completion for a percentage goal
    #[arg(long, allow_negative_numbers = true, conflicts_with_all = ["start", "end"])]
    pub progress: Option<i64>,

    /// Start of a timeframe goal
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<DateTime<Utc>>,

    /// End of a timeframe goal
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Goal index
    pub index: usize,

    #[arg(long)]
    pub name: Option<String>,

    /// Switch the goal type
    #[arg(long = "type", value_enum)]
    pub goal_type: Option<TypeArg>,

    #[arg(long, allow_negative_numbers = true)]
    pub progress: Option<i64>,

    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<DateTime<Utc>>,

    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Percentage,
    Timeframe,
}

impl From<TypeArg> for GoalType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Percentage => GoalType::Percentage,
            TypeArg::Timeframe => GoalType::Timeframe,
        }
    }
}

pub fn parse_date_arg(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|d| d.and_utc())
            .ok_or_else(|| format!("invalid date: {s}"));
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| format!("invalid date '{s}': expected YYYY-MM-DD or RFC 3339"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_arg() {
        let midnight = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date_arg("2025-06-01"), Ok(midnight));
        assert_eq!(
            parse_date_arg("2025-06-01T09:30:00+02:00"),
            Ok(Utc.with_ymd_and_hms(2025, 6, 1, 7, 30, 0).unwrap())
        );
        assert!(parse_date_arg("06/01/2025").is_err());
    }

    #[test]
    fn test_show_grid_size() {
        let parse = |args: &[&str]| -> Result<DotGrid, clap::Error> {
            let cli = Cli::try_parse_from(args)?;
            match cli.command {
                Commands::Show(show) => Ok(show.grid()),
                _ => unreachable!(),
            }
        };

        assert_eq!(parse(&["goaldots", "show"]).unwrap(), DotGrid::new(20, 5));
        assert_eq!(parse(&["goaldots", "show", "--width", "12", "--height", "3"]).unwrap(), DotGrid::new(12, 3));
        assert!(parse(&["goaldots", "show", "--columns", "70000", "--rows", "70000"]).is_err());
        assert!(parse(&["goaldots", "show", "--rows", "0"]).is_err());
        assert!(parse(&["goaldots", "show", "--width", "12"]).is_err());
        assert!(parse(&["goaldots", "show", "--width", "12", "--height", "3", "--columns", "4"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
