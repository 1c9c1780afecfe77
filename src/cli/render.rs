//! Render command implementation.
//!
//! Loads images, recolours them with a recipe, and writes PNG output.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

use clap::Args;
use notify::{EventKind, RecursiveMode, Watcher};
use walkdir::WalkDir;

use crate::error::{LabError, Result};
use crate::output::{display_path, elapsed, plural, Printer};
use crate::recipe::{Recipe, RECIPE_FILENAME};
use crate::render::{is_image_path, load_png, write_png, Session};
use crate::types::BackgroundMode;

/// Recolour images using a recipe
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Images, or directories to search for images
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Recipe file
    #[arg(long, short, default_value = RECIPE_FILENAME)]
    pub recipe: PathBuf,

    /// Output directory
    #[arg(long, short, default_value = "dist")]
    pub output: PathBuf,

    /// Background mode, overriding the recipe (keep, remove, replace)
    #[arg(long)]
    pub background: Option<BackgroundMode>,

    /// Re-render when the recipe changes (single input only)
    #[arg(long)]
    pub watch: bool,
}

pub fn run(args: RenderArgs, printer: &Printer) -> Result<()> {
    if !args.output.exists() {
        fs::create_dir_all(&args.output).map_err(|e| LabError::Io {
            path: args.output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let inputs = collect_inputs(&args.inputs, printer);
    if inputs.is_empty() {
        return Err(LabError::Parse {
            message: "No images found".to_string(),
            help: Some("Pass image files or directories containing .png/.jpg images".to_string()),
        });
    }

    if args.watch {
        return match inputs.as_slice() {
            [input] => watch(input, &args, printer),
            _ => Err(LabError::Parse {
                message: format!("--watch needs a single image, got {}", inputs.len()),
                help: None,
            }),
        };
    }

    let recipe = Recipe::load(&args.recipe)?;
    let start = Instant::now();

    for input in &inputs {
        let mut session = Session::with_frame(load_png(input)?);
        render_to_file(&mut session, input, &recipe, &args, printer)?;
    }

    printer.success(
        "Finished",
        &format!(
            "{} to {} in {}",
            plural(inputs.len(), "image", "images"),
            display_path(&args.output),
            elapsed(start.elapsed())
        ),
    );

    Ok(())
}

/// Expand directories into the images they contain, in a stable order.
fn collect_inputs(paths: &[PathBuf], printer: &Printer) -> Vec<PathBuf> {
    let mut inputs = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && is_image_path(entry.path()) {
                    inputs.push(entry.path().to_path_buf());
                }
            }
        } else if is_image_path(path) {
            inputs.push(path.clone());
        } else {
            printer.warning("Skipping", &format!("unsupported file {}", display_path(path)));
        }
    }

    inputs
}

/// `<output>/<stem>.png` for an input image.
fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{}.png", stem))
}

/// Render the session's frame with a recipe and write it next to the
/// other outputs.
fn render_to_file(
    session: &mut Session,
    input: &Path,
    recipe: &Recipe,
    args: &RenderArgs,
    printer: &Printer,
) -> Result<PathBuf> {
    let rules = recipe.rule_set();
    let mut params = recipe.params();
    if let Some(mode) = args.background {
        params.background = mode;
    }

    let (width, height) = session.frame().map(|f| f.dimensions()).unwrap_or((0, 0));
    printer.status(
        "Rendering",
        &format!(
            "{} ({}x{}, {})",
            display_path(input),
            width,
            height,
            plural(rules.len(), "rule", "rules")
        ),
    );

    let frame = session.render(&rules, &params).ok_or_else(|| LabError::Image {
        path: input.to_path_buf(),
        message: "No frame loaded".to_string(),
    })?;

    let path = output_path(input, &args.output);
    write_png(&frame, &path)?;
    Ok(path)
}

/// Render once, then again every time the recipe file changes.
///
/// The frame stays loaded between renders, so gradients whose settings did
/// not change come straight from the cache.
fn watch(input: &Path, args: &RenderArgs, printer: &Printer) -> Result<()> {
    let mut session = Session::with_frame(load_png(input)?);

    let rerender = |session: &mut Session| -> Result<PathBuf> {
        let recipe = Recipe::load(&args.recipe)?;
        render_to_file(session, input, &recipe, args, printer)
    };

    let path = rerender(&mut session)?;
    printer.success("Rendered", &display_path(&path));

    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = notify::recommended_watcher(tx).map_err(watch_error)?;

    // Watch the directory: editors often replace the file rather than
    // writing it in place.
    let recipe_dir = match args.recipe.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    watcher
        .watch(&recipe_dir, RecursiveMode::NonRecursive)
        .map_err(watch_error)?;
    printer.info("Watching", &display_path(&args.recipe));

    let recipe_name = args.recipe.file_name().map(|n| n.to_os_string());

    for res in rx {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                printer.warning("Watch", &e.to_string());
                continue;
            }
        };

        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            continue;
        }
        let touches_recipe = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == recipe_name);
        if !touches_recipe {
            continue;
        }

        let start = Instant::now();
        match rerender(&mut session) {
            Ok(path) => printer.success(
                "Rendered",
                &format!("{} in {}", display_path(&path), elapsed(start.elapsed())),
            ),
            Err(e) => printer.error("Failed", &e.to_string()),
        }
        tracing::debug!(
            cached = session.cache().len(),
            hits = session.cache().hits(),
            misses = session.cache().misses(),
            "gradient cache"
        );
    }

    Ok(())
}

fn watch_error(e: notify::Error) -> LabError {
    LabError::Watch {
        message: e.to_string(),
    }
}
