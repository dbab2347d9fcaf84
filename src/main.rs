//! contentaudit CLI entry point.

use clap::Parser;
use contentaudit::cli::{self, Cli, Commands, EXIT_ERROR};

/// Log to stderr so reports on stdout stay clean. `RUST_LOG` overrides the
/// default level, e.g. `RUST_LOG=contentaudit=debug`.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Audit(args) => cli::run_audit(&args),
        Commands::Rules(args) => cli::run_rules(&args),
        Commands::Init(args) => cli::run_init(&args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
