use clap::Parser;
use perfreport::cli::{self, Cli, Commands};
use perfreport::errors::PerfError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color && !cli.log_json);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        built = option_env!("PERFREPORT_BUILT_AT").unwrap_or("unknown"),
        commit = option_env!("PERFREPORT_COMMIT").unwrap_or("unknown"),
        "perfreport starting"
    );

    let result = match cli.command {
        Commands::Serve(args) => cli::serve::handle_serve(args).await,
        Commands::Analyze(args) => cli::analyze::handle_analyze(args).await,
        Commands::Validate(args) => cli::handle_validate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            PerfError::Config(_) => 2,
            PerfError::AuditEngine(_) => 3,
            PerfError::Authentication(_) => 4,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
