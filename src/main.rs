//! Demo driver: runs the texture bridge against the harness engine and
//! prints a digest of every presented frame.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sha2::{Digest, Sha256};

use webtex::engine::harness::HarnessEngine;
use webtex::{
    BridgeConfig, BrowserSettings, CooperativeScheduler, EngineLifecycle, PaintSurface,
    SurfaceOptions, TextureTarget,
};

#[derive(Parser, Debug)]
#[command(
    name = "webtex",
    about = "Drive the off-screen texture bridge for a few frames"
)]
struct Args {
    /// Navigation URL handed to the browser session
    #[arg(long, default_value = "about:blank")]
    url: String,

    /// Surface width in pixels (overrides the config)
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels (overrides the config)
    #[arg(long)]
    height: Option<u32>,

    /// Number of host frames to run
    #[arg(long, default_value_t = 3)]
    frames: u32,

    /// Resize the surface to WIDTHxHEIGHT/2 halfway through, to show the
    /// resize-then-repaint cycle
    #[arg(long)]
    resize_midway: bool,

    /// JSON bridge config file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Texture sink that hashes each uploaded frame instead of talking to a GPU
struct DigestTarget {
    width: u32,
    height: u32,
    digest: String,
}

impl TextureTarget for DigestTarget {
    fn upload_rgba(&mut self, width: u32, height: u32, data: &[u8]) {
        self.width = width;
        self.height = height;
        self.digest = hex::encode(Sha256::digest(data));
    }
}

fn load_config(args: &Args) -> anyhow::Result<BridgeConfig> {
    match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(BridgeConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let mut scheduler = CooperativeScheduler::new();
    let mut lifecycle = EngineLifecycle::new(HarnessEngine::new());
    lifecycle.start(&config, &mut scheduler)?;

    let engine = lifecycle.engine();
    let width = args.width.unwrap_or(config.texture_width);
    let height = args.height.unwrap_or(config.texture_height);
    let browser_settings = BrowserSettings {
        windowless_frame_rate: Some(30),
        ..BrowserSettings::default()
    };
    let opts = SurfaceOptions::from_config(&config, &args.url)
        .with_size(width, height)
        .with_window_handle(0x1)
        .with_browser_settings(browser_settings);
    let mut surface = PaintSurface::create(&mut *engine.borrow_mut(), None, opts)?;

    let mut target = DigestTarget {
        width: 0,
        height: 0,
        digest: String::new(),
    };
    for frame in 0..args.frames {
        if args.resize_midway && frame == args.frames / 2 {
            surface.set_height(height / 2)?;
            println!("resized to {}x{}", surface.width(), surface.height());
        }
        scheduler.run_frame();
        surface.present_to(&mut target);
        println!(
            "frame {:>3}: {}x{} sha256={}",
            frame, target.width, target.height, target.digest
        );
    }

    for err in engine.borrow_mut().take_errors() {
        eprintln!("callback error: {err}");
    }
    lifecycle.stop(&mut scheduler);
    Ok(())
}
