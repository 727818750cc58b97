use std::rc::Rc;
use std::time::Instant;

use crate::configuration::config::SceneConfig;
use crate::error::SimResult;
use crate::pointer::events::{PointerEvent, PointerEventBus, Viewport};
use crate::render::target::HeadlessRenderer;
use crate::simulation::scenario::Scenario;
use crate::simulation::simulator::Simulator;

/// Mean `Simulator::update` time in milliseconds for growing sphere counts
pub fn bench_update(frames: usize) -> SimResult<Vec<(usize, f64)>> {
    // Different cluster sizes to test
    let ns = [12, 48, 192, 768, 3072];
    let mut results = Vec::with_capacity(ns.len());

    for n in ns {
        let mut cfg = SceneConfig::default();
        cfg.spheres.count = n;
        cfg.debug.visuals = false;
        let scenario = Scenario::build_scenario(cfg)?;

        let viewport = Viewport::new(1280.0, 720.0);
        let bus = Rc::new(PointerEventBus::new(viewport));
        let mut sim = Simulator::new(&scenario, &bus)?;
        let mut renderer = HeadlessRenderer::new();

        let frames = frames.max(1);
        let t0 = Instant::now();
        for i in 0..frames {
            // sweep the pointer so the projector does real work
            let x = (i % 1280) as f64;
            bus.dispatch(&PointerEvent::MouseMove { page_x: x, page_y: 360.0 });
            sim.update(&mut renderer)?;
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / frames as f64;

        println!("n = {:5}, update = {:8.4} ms/frame", n, ms);
        results.push((n, ms));
    }

    Ok(results)
}
