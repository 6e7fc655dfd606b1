use hdsim::{AppConfig, Cli, Commands, commands};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

fn main() -> anyhow::Result<()> {
    // RUST_LOG=hd_booking=debug shows one line per processed day.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::import().unwrap_or_else(|e| e.exit());
    let config = AppConfig::load(&cli)?;

    match &cli.command {
        Commands::Generate(args) => commands::generate(config, args),
        Commands::Run(args) => commands::run(config, args),
        Commands::Status(args) => commands::status(args),
        Commands::Stats(args) => commands::stats(args),
    }
}
