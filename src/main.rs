mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod source;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let loaded = Config::load();
    let cli = Cli::parse().with_config(&loaded.config);

    init_logging(cli.debug);
    if let Some(path) = &loaded.path {
        log::debug!("loaded config from {}", path.display());
    }
    for warning in &loaded.warnings {
        log::warn!("{warning}");
    }

    if let Err(e) = app::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
