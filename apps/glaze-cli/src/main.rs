use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use glaze_animation::{Animator, HUE_STEP, ROTATION_STEP};
use glaze_common::Color;
use glaze_render::{SceneRenderer, TextFrameRenderer, ViewSettings};
use glaze_scene::{GRID_SPACING, Material, MaterialStore, Scene, SceneObject};

#[derive(Parser)]
#[command(name = "glaze-cli", about = "Headless tools for the glaze scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and scene constants
    Info,
    /// Parse a GLB model and print its mesh summary
    Inspect {
        /// Path to the model file
        model: PathBuf,
    },
    /// Build the grid headlessly, advance it, and print the frame digest
    Grid {
        /// Seed for the backdrop color
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Number of animation frames to advance before printing
        #[arg(short, long, default_value = "0")]
        frames: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("glaze-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("grid spacing: {GRID_SPACING}");
            println!(
                "rotation step: ({}, {}, {}) rad/frame",
                ROTATION_STEP.x, ROTATION_STEP.y, ROTATION_STEP.z
            );
            println!("hue step: {HUE_STEP} turns/frame");
        }
        Commands::Inspect { model } => {
            let (id, mesh) = glaze_assets::load_template(&model)?;
            println!("{}", model.display());
            println!("  id: {:#018x}", id.0);
            println!("  mesh: {}", mesh.name);
            println!("  vertices: {}", mesh.vertex_count());
            println!("  indices: {}", mesh.index_count());
            println!("  triangles: {}", mesh.triangle_count());
        }
        Commands::Grid { seed, frames } => {
            let backdrop = Color::muted_from_seed(seed);
            let mut materials = MaterialStore::new();
            let shared = materials.add(Material {
                name: "bowl".into(),
                color: backdrop,
            });
            let mut scene = Scene::new(backdrop);
            scene.populate_grid(&SceneObject::new(shared), GRID_SPACING, shared);

            let mut animator = Animator::new();
            for _ in 0..frames {
                animator.step(&mut scene, &mut materials, shared, |_, _| Ok(()));
            }

            let renderer = TextFrameRenderer::new();
            print!(
                "{}",
                renderer.render(&scene, &materials, &ViewSettings::default())
            );
        }
    }

    Ok(())
}
