// CHRONOREEL Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL

use chronoreel_core::config::{ReelConfig, DEFAULT_ASSETS_FILE, DEFAULT_PLAN_FILE};
use chronoreel_core::pipeline::catalog::{load_catalog, load_plan};
use chronoreel_core::pipeline::run::plan_decisions;
use chronoreel_core::pipeline::{AssetChoice, AssetRun, Materializer, StudioBackend};
use chronoreel_core::studio::assembler::VideoAssembler;
use chronoreel_core::studio::planner::{write_plan, ScriptPlanner};
use chronoreel_core::studio::{health, scanner};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "chronoreel-core")]
#[command(about = "CHRONOREEL Documentary Asset Kernel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index archival images into an asset pool file
    Catalog {
        /// Archive root to walk
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Output inventory path
        #[arg(short, long, default_value = DEFAULT_ASSETS_FILE)]
        output: PathBuf,
    },

    /// Draft the narration plan with an LLM
    Plan {
        /// Documentary subject
        #[arg(short, long)]
        topic: String,

        /// Output plan path
        #[arg(short, long, default_value = DEFAULT_PLAN_FILE)]
        output: PathBuf,

        /// Candidate models, tried in order (comma-separated)
        #[arg(long, value_delimiter = ',')]
        models: Vec<String>,
    },

    /// Produce narration audio and images for every segment
    Generate {
        /// Narration plan
        #[arg(short, long, default_value = DEFAULT_PLAN_FILE)]
        plan: PathBuf,

        /// Real-image inventory
        #[arg(short, long, default_value = DEFAULT_ASSETS_FILE)]
        assets: PathBuf,

        /// Output directory (overrides CHRONOREEL_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print decisions without producing files
        #[arg(long)]
        dry_run: bool,

        /// Re-synthesize images even if they already exist
        #[arg(long)]
        regenerate_images: bool,
    },

    /// Stitch generated assets into the final video
    Assemble {
        /// Narration plan
        #[arg(short, long, default_value = DEFAULT_PLAN_FILE)]
        plan: PathBuf,

        /// Directory holding audio_<id>/image_<id> pairs
        #[arg(short, long)]
        assets_dir: Option<PathBuf>,

        /// Output video path
        #[arg(short, long, default_value = "final_submission.mp4")]
        output: PathBuf,
    },

    /// Check external tool availability
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,reqwest=warn,hyper=warn");
    }
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        eprintln!("🚨 [CHRONOREEL PANIC] at {}: {}", location, panic_info);
    }));

    info!("--- CHRONOREEL v{} ---", env!("CARGO_PKG_VERSION"));

    let config = ReelConfig::from_env();
    let args = Cli::parse();

    match args.command {
        Commands::Catalog { root, output } => {
            let records = scanner::scan_inventory(&root)?;
            scanner::write_inventory(&records, &output)?;
            println!("📸 Indexed {} images to {:?}", records.len(), output);
        }
        Commands::Plan {
            topic,
            output,
            models,
        } => {
            let planner = ScriptPlanner::new(&config.llm_api_url, config.llm_api_key.clone(), models)
                .with_timeout(config.request_timeout);
            let plan = planner.generate_plan(&topic).await?;
            write_plan(&plan, &output)?;
            println!("🎉 Script with {} segments saved to {:?}", plan.segments.len(), output);
        }
        Commands::Generate {
            plan,
            assets,
            output_dir,
            dry_run,
            regenerate_images,
        } => {
            let (segments, pool) = load_catalog(&plan, &assets)?;

            if dry_run {
                for decision in plan_decisions(&segments, &pool) {
                    match &decision.choice {
                        AssetChoice::ReuseReal { source, date } => {
                            println!("segment {:>3}: REAL  {:?} ({})", decision.segment_id, source, date)
                        }
                        AssetChoice::SynthesizeAi { style } => {
                            println!("segment {:>3}: AI    {}", decision.segment_id, style)
                        }
                    }
                }
                return Ok(());
            }

            if !health::report_dependencies() {
                tracing::debug!("Continuing; missing tools surface as per-segment failures.");
            }

            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let backend = Arc::new(StudioBackend::from_config(&config));
            let materializer = Materializer::new(backend, &output_dir, config.retry)
                .reuse_existing_images(!regenerate_images);

            let report = AssetRun::new(materializer)
                .execute(&segments, &pool)
                .await?;
            report
                .save(&output_dir)
                .context("Failed to write run report")?;

            println!("{}", report.summary());
            println!("🎉 Assets ready! Run: chronoreel-core assemble");
        }
        Commands::Assemble {
            plan,
            assets_dir,
            output,
        } => {
            let segments = load_plan(&plan)?;
            let assets_dir = assets_dir.unwrap_or_else(|| config.output_dir.clone());
            let assembler = VideoAssembler::new(&assets_dir.join(".chronoreel_work"));
            let out = assembler.assemble(&segments, &assets_dir, &output).await?;
            println!("🎬 Video is ready: {:?}", out);
        }
        Commands::Doctor => {
            if health::report_dependencies() {
                println!("✅ All external tools found.");
            } else {
                println!("❌ Missing: {:?}", health::check_dependencies());
            }
        }
    }

    Ok(())
}
