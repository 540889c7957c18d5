use std::path::Path;

use clap::Parser;
use daily_todo::cli::commands::Cli;
use daily_todo::cli::handlers;
use daily_todo::io::store_io::resolve_data_dir;

fn main() {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.as_deref().map(Path::new));

    let result = match cli.command {
        None => {
            // No subcommand → launch TUI (it sets up its own file logger)
            daily_todo::tui::run(&data_dir)
        }
        Some(command) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .format_timestamp(None)
                .init();
            handlers::dispatch(command, &data_dir, cli.json)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
