use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use goaldots::cli;
use goaldots::cli::commands::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GOALDOTS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    let data_dir = cli_args.data_dir.clone();

    let exit_code = match cli_args.command {
        Commands::List => cli::view::run_list(json_output, data_dir.as_deref()),
        Commands::Show(args) => cli::view::run_show(args, json_output, data_dir.as_deref()),
        Commands::Add(args) => cli::goal::run_add(args, json_output, data_dir.as_deref()),
        Commands::Edit(args) => cli::goal::run_edit(args, json_output, data_dir.as_deref()),
        Commands::Remove { index } => cli::goal::run_remove(index, json_output, data_dir.as_deref()),
        Commands::Select { index } => cli::goal::run_select(index, json_output, data_dir.as_deref()),
    };

    process::exit(exit_code);
}
