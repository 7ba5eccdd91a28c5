use clap::Parser;
use smacross::cli::{print_config, Cli, Commands};
use smacross::config::{Config, Secrets};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Secrets live in the environment, optionally seeded from .env
    let _ = dotenvy::dotenv();
    let secrets = Secrets::from_env();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {:#}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        }
    };

    // Initialize telemetry
    let _telemetry = smacross::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting crossover monitor");
            args.execute(&config, &secrets).await?;
        }
        Commands::Check(args) => {
            args.execute(&config, &secrets).await?;
        }
        Commands::Flow(args) => {
            args.execute(&config, &secrets).await?;
        }
        Commands::Config => {
            print_config(&config, &secrets);
        }
    }

    Ok(())
}
