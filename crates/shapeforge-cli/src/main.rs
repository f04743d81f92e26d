//! Shapeforge CLI - Main entry point
//!
//! Generates the React, Next.js and Vanilla Three.js snippets for a scene
//! described in TOML, without opening the editor.

mod config;
mod inspect;

use anyhow::Result;
use clap::Parser;
use shapeforge_core::generate;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "shapeforge")]
#[command(about = "Generate Three.js code for a configured shape or model")]
#[command(version)]
struct Args {
    /// Path to scene description file
    #[arg(short, long, default_value = "shapeforge.toml")]
    config: PathBuf,

    /// Primitive shape to use (overrides [scene].shape and clears any model)
    #[arg(short, long)]
    shape: Option<String>,

    /// Model path to use (overrides [scene].model)
    #[arg(short, long)]
    model: Option<String>,

    /// Animation preset id, 1-5
    #[arg(short, long)]
    animation: Option<u8>,

    /// Snippet variant: react, next, vanilla, or all
    #[arg(long)]
    variant: Option<String>,

    /// Write snippets to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Write a default scene description to --config and exit
    #[arg(long)]
    init: bool,

    /// Print the bound object and camera state as JSON instead of code
    #[arg(long)]
    inspect: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Shapeforge v{}", env!("CARGO_PKG_VERSION"));

    if args.init {
        config::save_default_config(&args.config)?;
        println!("Wrote {}", args.config.display());
        return Ok(());
    }

    let mut config = config::load_config(&args.config)?;

    // Command line overrides
    if let Some(shape) = args.shape {
        config.scene.shape = shape;
        config.scene.model = None;
    }
    if let Some(model) = args.model {
        config.scene.model = Some(model);
    }
    if args.animation.is_some() {
        config.scene.animation = args.animation;
    }
    if let Some(variant) = args.variant {
        config.output.variant = variant;
    }
    if let Some(output) = args.output {
        config.output.path = Some(output);
    }

    let shape = config.scene.shape_reference();
    let store = config.build_store()?;
    let settings = store.snapshot();

    info!(
        shape = %shape.label(),
        revision = store.revision(),
        "Scene configured"
    );

    let text = if args.inspect {
        serde_json::to_string_pretty(&inspect::inspect(&shape, &settings))?
    } else {
        let snippet = generate(&settings, &shape, settings.animation);
        let variants = config.output.variants()?;
        if variants.len() == 1 {
            snippet.get(variants[0]).to_string()
        } else {
            variants
                .iter()
                .map(|variant| format!("// ---- {} ----\n{}", variant, snippet.get(*variant)))
                .collect::<Vec<_>>()
                .join("\n")
        }
    };

    match &config.output.path {
        Some(path) => {
            std::fs::write(path, &text)?;
            info!(path = %path.display(), "Output written");
        }
        None => println!("{}", text),
    }

    Ok(())
}
