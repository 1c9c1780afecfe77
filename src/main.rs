use clap::Parser;
use miette::Result;
use surfacelab::cli::{Cli, Commands};
use surfacelab::output::Printer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let printer = Printer::new();

    match cli.command {
        Commands::Render(args) => surfacelab::cli::render::run(args, &printer)?,
        Commands::Init(args) => surfacelab::cli::init::run(args, &printer)?,
        Commands::Palette(args) => surfacelab::cli::palette::run(args, &printer)?,
        Commands::Completions(args) => surfacelab::cli::completions::run(args)?,
    }

    Ok(())
}
