use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use publish::bridge::ControlBridge;
use source::open_source;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use targetcore::control::{SharedThresholds, Thresholds};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{SourceMode, WorkflowConfig};
use workflow::runner::Runner;
use workflow::settings::Settings;

mod publish;
mod source;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Color-target tracker that publishes horizontal bearings")]
struct Args {
    /// Persisted camera index and color range (JSON)
    #[arg(long, default_value = "config.json")]
    settings: PathBuf,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Frame source; overrides the workflow config
    #[arg(long, value_enum)]
    mode: Option<SourceMode>,
    /// Camera device index; overrides the settings file
    #[arg(long)]
    camera_index: Option<u32>,
    #[arg(long)]
    static_path: Option<PathBuf>,
    #[arg(long)]
    stream_url: Option<String>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// Principal point x in pixels
    #[arg(long)]
    principal_x: Option<f64>,
    /// Focal length in pixels
    #[arg(long)]
    focal_length: Option<f64>,
    /// Absolute minimum hull area in square pixels
    #[arg(long)]
    min_area: Option<f64>,
    /// ZeroMQ endpoint to publish bearings on, e.g. tcp://*:5800
    #[arg(long)]
    publish: Option<String>,
    /// Serve the HTTP control surface while tracking
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<String>,
    /// Write annotated frames into this directory
    #[arg(long)]
    overlay_dir: Option<PathBuf>,
    #[arg(long)]
    overlay_every: Option<u64>,
    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
    /// Process a single frame and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn apply(&self, config: &mut WorkflowConfig) {
        if let Some(mode) = self.mode {
            config.source.mode = mode;
        }
        if let Some(path) = &self.static_path {
            config.source.static_path = path.clone();
        }
        if let Some(url) = &self.stream_url {
            config.source.stream_url = url.clone();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(x) = self.principal_x {
            config.camera.principal_point_x = x;
        }
        if let Some(focal) = self.focal_length {
            config.camera.focal_length_px = focal;
        }
        if let Some(floor) = self.min_area {
            config.area.floor = floor;
        }
        if let Some(endpoint) = &self.publish {
            config.publish = Some(endpoint.clone());
        }
        if let Some(bind) = &self.bind {
            config.bind = bind.clone();
        }
        if let Some(dir) = &self.overlay_dir {
            config.overlay.directory = Some(dir.clone());
        }
        if let Some(every) = self.overlay_every {
            config.overlay.every = every;
        }
    }
}

/// Clears `running` on Ctrl+C so the frame loop can finish its current frame.
fn watch_for_shutdown(running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;
    thread::spawn(move || {
        runtime.block_on(async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Ctrl+C received, stopping"),
                Err(err) => warn!("signal handler failed ({}), stopping", err),
            }
        });
        running.store(false, Ordering::SeqCst);
    });
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    let mut settings = Settings::load(&args.settings);
    if let Some(index) = args.camera_index {
        settings.camera_index = index;
    }
    let thresholds = SharedThresholds::new(Thresholds {
        color_range: settings.color_range(),
        area: config.area,
    });

    let runner = Runner::new(config.clone());
    let bridge = if args.serve {
        Some(ControlBridge::spawn(&config.bind, thresholds.clone())?)
    } else {
        None
    };
    let mut publisher = runner.publishers(bridge.as_ref())?;

    let outcome = open_source(&config, settings.camera_index).and_then(|mut source| {
        if args.offline {
            let summary = runner.offline(source.as_mut(), &mut publisher, thresholds.clone())?;
            println!("{}", summary);
        } else {
            let running = Arc::new(AtomicBool::new(true));
            watch_for_shutdown(running.clone())?;
            if config.source.mode == SourceMode::Static {
                info!("static image mode: the same frame is processed until stopped");
            }
            runner.execute(
                source.as_mut(),
                &mut publisher,
                thresholds.clone(),
                &running,
                args.max_frames,
            )?;
        }
        Ok(())
    });

    settings.set_color_range(thresholds.snapshot().color_range);
    if let Err(err) = settings.save(&args.settings) {
        warn!("could not persist settings: {:#}", err);
    }
    outcome
}
