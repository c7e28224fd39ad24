// ReelPress Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | ReelPress

use reelpress_core::config::AppConfig;
use reelpress_core::media::health;
use reelpress_core::media::picker::{DialogPicker, MediaPicker, StaticPicker};
use reelpress_core::media::{PickOutcome, VideoWorkflow};
use reelpress_core::window;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "reelpress-core")]
#[command(about = "Pick a video, compress it with ffmpeg, preview both", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the picker window (default)
    Gui,

    /// Run the pick -> compress workflow on a known file
    Compress {
        /// Input video path
        #[arg(short, long)]
        input: PathBuf,

        /// Print the resulting list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Choose a file with the native dialog, then compress it
    Pick {
        /// Print the resulting list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the transcoder is runnable
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Quiet the GUI stack unless the user asked for it.
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,wgpu_core=error,wgpu_hal=error,naga=error,winit=error,eframe=warn,egui_glow=warn");
    }

    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[REELPRESS PANIC] at {}: {}", location, message);
    }));

    let config = AppConfig::from_env();
    info!(
        "--- REELPRESS v{} --- cache: {:?}, transcoder: {:?}, {:?}",
        env!("CARGO_PKG_VERSION"),
        config.cache_root,
        config.ffmpeg_bin,
        config.concurrency
    );

    let args = Cli::parse();

    match args.command.unwrap_or(Commands::Gui) {
        Commands::Gui => {
            let workflow = Arc::new(VideoWorkflow::from_config(&config, Arc::new(DialogPicker::default())));
            let runtime = tokio::runtime::Handle::current();
            let ffmpeg = config.ffmpeg_bin.clone();

            info!("Launching window...");
            let res = tokio::task::block_in_place(|| window::run_gui(workflow, runtime, ffmpeg));
            if let Err(e) = res {
                error!("GUI Error: {}", e);
            }
        }
        Commands::Compress { input, json } => {
            run_headless(&config, Arc::new(StaticPicker::new(input)), json).await?;
        }
        Commands::Pick { json } => {
            run_headless(&config, Arc::new(DialogPicker::default()), json).await?;
        }
        Commands::Doctor => {
            let reports = health::check_dependencies(&config).await;
            for report in &reports {
                let mark = if report.available { "OK " } else { "MISSING" };
                println!("{} {:<24} {}", mark, report.name, report.detail);
            }
            println!("cache root: {}", config.cache_root.display());
            let missing = health::missing(&reports);
            if !missing.is_empty() {
                anyhow::bail!("missing dependencies: {}", missing.join(", "));
            }
        }
    }

    Ok(())
}

/// One pick, wait for its compression, then print the list.
async fn run_headless(config: &AppConfig, picker: Arc<dyn MediaPicker>, json: bool) -> anyhow::Result<()> {
    let workflow = VideoWorkflow::from_config(config, picker);

    match workflow.open_picker().await {
        PickOutcome::Cancelled => println!("Picker cancelled."),
        PickOutcome::Failed(e) => return Err(e).context("could not acquire video"),
        PickOutcome::Acquired { record, compression } => {
            println!("Acquired {} ({} MB), compressing...", record.url, record.size);
            match compression.await.context("compression task panicked")? {
                Ok(out) => println!("Compressed {} ({} MB)", out.url, out.size),
                Err(e) => println!("Compression failed: {}", e),
            }
        }
    }

    let records = workflow.records().snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(records.as_slice())?);
    } else {
        for record in &records {
            println!("{:>8} MB  {}", record.size, record.url);
        }
    }
    Ok(())
}
