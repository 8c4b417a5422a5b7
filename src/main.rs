use clap::Parser;
use clientele::cli::{self, Cli, Commands};
use clientele::config::Config;
use tracing::{error, info};

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.logging.init();
    info!("clientele starting");

    let result = match cli.command {
        Commands::Run => cli::run::execute(&config),
        Commands::Stats(args) => cli::stats::execute(&config, args.min_total),
        Commands::CheckConfig => cli::check::execute(cli.config.as_deref()),
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }

    info!("clientele stopped");
}
