pub mod completions;
pub mod init;
pub mod palette;
pub mod render;

use clap::{Parser, Subcommand};

/// surfacelab - Recolour image regions with procedural gradients
#[derive(Parser, Debug)]
#[command(name = "surfacelab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recolour images using a recipe
    Render(render::RenderArgs),

    /// Write a starter recipe (surfacelab.yaml)
    Init(init::InitArgs),

    /// Suggest rules from the most common colours of an image
    Palette(palette::PaletteArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
