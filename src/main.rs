use clap::Parser;
use page_scaffold::cli::commands::{cmd_analyze, cmd_generate, cmd_plan};
use page_scaffold::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze { source, output } => {
            cmd_analyze(&source, output.as_deref(), &config)?;
        }
        Commands::Plan {
            source,
            output_dir,
            format,
        } => {
            cmd_plan(&source, &output_dir, format, &config)?;
        }
        Commands::Generate {
            source,
            output_dir,
            no_plan,
        } => {
            cmd_generate(&source, &output_dir, no_plan, &config)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for JSON output.
/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}
