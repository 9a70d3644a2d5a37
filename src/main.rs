// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command line access to hotspot scene documents.
//!
//! Validates, converts and inspects scene and dialog project files without
//! opening an editor.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hotspots::io::serialization::{export, import_dialog_project, import_scene_project};
use hotspots::models::project::{CoordsMode, SceneProject};
use hotspots::util::geometry::convert_mode;
use hotspots::util::shape::hit_test_scene;
use hotspots::{EditorConfig, ValidationError};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "hotspots", about = "Hotspot scene document tools")]
struct Cli {
    /// Editor config file (YAML or JSON)
    #[arg(long, global = true, env = "HOTSPOTS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a document and report every structural problem
    Validate {
        file: PathBuf,
        /// Treat the file as a dialog project
        #[arg(long)]
        dialog: bool,
    },
    /// Rewrite a scene project into another coordinate mode
    Convert {
        file: PathBuf,
        #[arg(long)]
        mode: CoordsMode,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Report the hotspot under a canvas pixel
    Hit {
        file: PathBuf,
        #[arg(long)]
        scene: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Re-export a document, choosing the format by output extension
    Export {
        file: PathBuf,
        #[arg(long, short)]
        output: PathBuf,
        #[arg(long)]
        dialog: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path),
        None => Ok(EditorConfig::default()),
    }
}

fn validate(file: &Path, dialog: bool) -> Result<()> {
    let result = if dialog {
        import_dialog_project(file).map(|p| format!("{} dialog(s)", p.dialogs.len()))
    } else {
        import_scene_project(file).map(|p| format!("{} scene(s)", p.scenes.len()))
    };
    match result {
        Ok(summary) => {
            println!("{}: ok, {}", file.display(), summary);
            Ok(())
        }
        Err(err) => match err.downcast_ref::<ValidationError>() {
            Some(validation) => {
                for issue in &validation.issues {
                    eprintln!("{}: {}", file.display(), issue);
                }
                bail!("{} failed validation with {} issue(s)", file.display(), validation.issues.len())
            }
            None => Err(err),
        },
    }
}

/// Describe the hotspot under `(x, y)` in scene `scene_id`.
fn describe_hit(config: &EditorConfig, project: &SceneProject, scene_id: &str, x: f64, y: f64) -> Result<String> {
    let scene = project
        .scene(scene_id)
        .with_context(|| format!("Scene '{}' not found", scene_id))?;
    let view = config.viewport(project)?;
    let line = match hit_test_scene(&view, scene, x, y, config.handle_tolerance) {
        Some(hit) => {
            let hotspot = &scene.hotspots[hit.hotspot_index];
            format!("{}: {} {} {:?}", scene.label(), hotspot.id, hotspot.shape(), hit.kind)
        }
        None => format!("{}: none", scene.label()),
    };
    Ok(line)
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Validate { file, dialog } => validate(&file, dialog),
        Command::Convert { file, mode, output } => {
            let project = import_scene_project(&file)?;
            let converted = convert_mode(&project, mode)?;
            export(&converted, &output)
        }
        Command::Hit { file, scene, x, y } => {
            let project = import_scene_project(&file)?;
            println!("{}", describe_hit(&config, &project, &scene, x, y)?);
            Ok(())
        }
        Command::Export { file, output, dialog } => {
            if dialog {
                export(&import_dialog_project(&file)?, &output)
            } else {
                export(&import_scene_project(&file)?, &output)
            }
        }
    }
}
