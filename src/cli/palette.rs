use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use image::RgbaImage;
use palette::color_difference::Ciede2000;
use palette::{IntoColor, Lab, Srgb};

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::recipe::Recipe;
use crate::render::background::BACKGROUND_MIN_ALPHA;
use crate::render::load_png;
use crate::types::{Colour, RenderParams, RuleSet};

/// Suggest rules from the most common colours of an image
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Image to sample colours from
    #[arg(required = true)]
    pub file: PathBuf,

    /// Maximum number of rules to suggest
    #[arg(long, default_value = "8")]
    pub max: usize,

    /// Tolerance for each suggested rule
    #[arg(long, default_value = "30")]
    pub tolerance: f32,

    /// Minimum CIEDE2000 difference between suggested colours
    #[arg(long, default_value = "10")]
    pub min_delta: f32,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let img = load_png(&args.file)?;
    let targets = suggest_targets(&img, args.max, args.min_delta);

    let mut rules = RuleSet::new();
    for target in targets {
        if let Some(id) = rules.add_target_if_absent(target) {
            if let Some(rule) = rules.get_mut(id) {
                rule.tolerance = args.tolerance.max(0.0);
            }
        }
    }

    printer.status(
        "Sampled",
        &format!(
            "{} from {}",
            plural(rules.len(), "colour", "colours"),
            display_path(&args.file)
        ),
    );

    // Recipe YAML on stdout so it can be redirected into a file
    let recipe = Recipe::from_parts(&rules, &RenderParams::default());
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(recipe.to_yaml()?.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Most frequent visible colours, skipping colours perceptually close to
/// one already chosen.
pub fn suggest_targets(img: &RgbaImage, max: usize, min_delta: f32) -> Vec<Colour> {
    let mut counts: HashMap<Colour, usize> = HashMap::new();
    for pixel in img.pixels() {
        if pixel.0[3] < BACKGROUND_MIN_ALPHA {
            continue;
        }
        *counts.entry(Colour::from_rgba(pixel.0)).or_insert(0) += 1;
    }

    // Most common first, ties broken by channel values for stable output
    let mut colours: Vec<(Colour, usize)> = counts.into_iter().collect();
    colours.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| (a.0.r, a.0.g, a.0.b).cmp(&(b.0.r, b.0.g, b.0.b)))
    });

    let mut chosen: Vec<(Colour, Lab)> = Vec::new();
    for (colour, _) in colours {
        if chosen.len() >= max {
            break;
        }
        let lab = to_lab(colour);
        if chosen.iter().all(|(_, other)| lab.difference(*other) >= min_delta) {
            chosen.push((colour, lab));
        }
    }

    chosen.into_iter().map(|(colour, _)| colour).collect()
}

fn to_lab(colour: Colour) -> Lab {
    let rgb: Srgb<f32> = Srgb::<u8>::from(colour).into_format();
    rgb.into_color()
}
