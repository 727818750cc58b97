use softbody::{bench_update, HeadlessRenderer, PointerEventBus, Scenario, SceneConfig, Simulator, Viewport};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser, Debug)]
struct Args {
    /// Scene file under scenarios/
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without a window and print the final sphere positions
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless/bench mode
    #[arg(long, default_value_t = 600)]
    frames: usize,

    /// Time the frame update for growing sphere counts
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scene(file_name: &str) -> Result<SceneConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let text = fs::read_to_string(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let cfg = SceneConfig::from_yaml_str(&text).with_context(|| format!("parsing {}", config_path.display()))?;
    Ok(cfg)
}

fn run_headless(scenario: Scenario, frames: usize) -> Result<()> {
    let vp = &scenario.config.viewport;
    let bus = Rc::new(PointerEventBus::new(Viewport::new(vp.width as f64, vp.height as f64)));
    let mut sim = Simulator::new(&scenario, &bus)?;
    let mut renderer = HeadlessRenderer::new();

    for _ in 0..frames {
        sim.update(&mut renderer)?;
    }
    info!("simulated {} frames ({:.3} s)", frames, sim.world().time());

    for (i, s) in sim.spheres().spheres().iter().enumerate() {
        println!(
            "{:3}  r = {:.3}  [{:+.4}, {:+.4}, {:+.4}]",
            i, s.radius, s.position[0], s.position[1], s.position[2]
        );
    }
    sim.dispose();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
        bench_update(args.frames)?;
        return Ok(());
    }

    let cfg = load_scene(&args.file_name)?;
    let scenario = Scenario::build_scenario(cfg)?;

    if args.headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        return run_headless(scenario, args.frames);
    }

    run_viewer(scenario)
}

#[cfg(feature = "viewer")]
fn run_viewer(scenario: Scenario) -> Result<()> {
    softbody::run_3d(scenario);
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run_viewer(_scenario: Scenario) -> Result<()> {
    anyhow::bail!("built without the `viewer` feature; use --headless")
}
