//! Init command implementation.
//!
//! Writes a starter `surfacelab.yaml` recipe.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{LabError, Result};
use crate::output::{display_path, Printer};
use crate::recipe::{Recipe, RECIPE_FILENAME};

/// Write a starter recipe
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write the recipe into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing recipe
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let recipe_path = args.path.join(RECIPE_FILENAME);

    if recipe_path.exists() && !args.force {
        return Err(LabError::Parse {
            message: format!("{} already exists", RECIPE_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    if !args.path.exists() {
        fs::create_dir_all(&args.path).map_err(|e| LabError::Io {
            path: args.path.clone(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }

    let yaml = Recipe::starter().to_yaml()?;
    fs::write(&recipe_path, yaml).map_err(|e| LabError::Io {
        path: recipe_path.clone(),
        message: format!("Failed to write recipe: {}", e),
    })?;

    printer.success("Created", &display_path(&recipe_path));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_recipe() {
        let dir = tempdir().unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        run(args, &Printer::plain()).unwrap();

        let recipe = Recipe::load(&dir.path().join(RECIPE_FILENAME)).unwrap();
        assert_eq!(recipe, Recipe::starter());
    }

    #[test]
    fn test_init_errors_if_recipe_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(RECIPE_FILENAME), "detail_lock: 0.5").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        assert!(run(args, &Printer::plain()).is_err());
        let content = fs::read_to_string(dir.path().join(RECIPE_FILENAME)).unwrap();
        assert_eq!(content, "detail_lock: 0.5");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(RECIPE_FILENAME), "detail_lock: 0.5").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };
        run(args, &Printer::plain()).unwrap();

        let content = fs::read_to_string(dir.path().join(RECIPE_FILENAME)).unwrap();
        assert!(content.contains("rules:"));
        assert!(content.contains("#FFFFFF"));
    }

    #[test]
    fn test_init_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("looks/warm");

        let args = InitArgs {
            path: nested.clone(),
            force: false,
        };
        run(args, &Printer::plain()).unwrap();

        assert!(nested.join(RECIPE_FILENAME).exists());
    }
}
