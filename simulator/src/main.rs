use anyhow::Context;
use clap::Parser;
use generator::scene::ScanGenerator;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use std::fs::{self, OpenOptions};
use std::future::Future;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Danger-zone monitor driver for a rotating range sensor")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Scans to process offline
    #[arg(long)]
    frames: Option<usize>,
    #[arg(long, default_value_t = 3)]
    quality_min: u8,
    #[arg(long, default_value_t = 200.0)]
    eps: f64,
    #[arg(long, default_value_t = 6)]
    min_points: usize,
    #[arg(long, default_value_t = 3)]
    window: usize,
    /// Cluster raw frames instead of the smoothed window
    #[arg(long, default_value_t = false)]
    raw: bool,
    /// Seed for the synthetic scene
    #[arg(long)]
    seed: Option<u64>,
    /// Append the run summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Stream generated scans and serve frames over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<SocketAddr>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.quality_min,
            args.eps,
            args.min_points,
            args.window,
            !args.raw,
        )
    };
    if let Some(frames) = args.frames {
        workflow_config.frames = frames;
    }
    if let Some(seed) = args.seed {
        workflow_config.scene.seed = seed;
    }
    workflow_config.validate()?;

    let runner = Runner::new(&workflow_config)?;
    let generator = ScanGenerator::new(workflow_config.scene.clone());

    if args.serve {
        let addr = args.bind.unwrap_or_else(gui_bind_address);
        return serve(runner, generator, &workflow_config, addr);
    }

    run_offline(runner, generator, &workflow_config, args.report)
}

fn run_offline(
    mut runner: Runner,
    generator: ScanGenerator,
    config: &WorkflowConfig,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let summary = runner.execute(generator, config.frames);

    let report = format!(
        "frames={} skipped={} empty={} smoothed={} alarm_frames={} first_alarm={:?}\n",
        summary.frames,
        summary.skipped,
        summary.empty,
        summary.smoothed,
        summary.alarm_frames,
        summary.first_alarm
    );
    print!("Offline run -> {}", report);

    if let Some(path) = report_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening report {}", path.display()))?;
        file.write_all(report.as_bytes())
            .with_context(|| format!("writing report {}", path.display()))?;
    }
    Ok(())
}

fn serve(
    runner: Runner,
    mut generator: ScanGenerator,
    config: &WorkflowConfig,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let bridge = GuiBridge::new(Arc::new(Mutex::new(runner)), config.pipeline.zone);
    let period = Duration::from_millis(config.frame_interval_ms.max(1));

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the GUI bridge")?;
    runtime.block_on(async {
        let server = bridge.spawn(addr);
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");

        let frames = stream_until(&bridge, &mut generator, period, signal::ctrl_c()).await?;

        server.abort();
        bridge.publish_status(&format!("stopped after {} frames", frames));
        Ok::<(), anyhow::Error>(())
    })
}

/// Feeds one generated scan per tick into `bridge` until `shutdown`
/// resolves. Returns the number of scans processed.
async fn stream_until<F>(
    bridge: &GuiBridge,
    generator: &mut ScanGenerator,
    period: Duration,
    shutdown: F,
) -> anyhow::Result<usize>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(period);
    let mut frames = 0;
    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("awaiting Ctrl+C to exit")?;
                return Ok(frames);
            }
            _ = ticker.tick() => {
                let scan = generator.next_scan();
                bridge.process(&scan).context("processing generated scan")?;
                frames += 1;
            }
        }
    }
}
