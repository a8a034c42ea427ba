use sketch_lanes::config::load_config;
use sketch_lanes::diagnostics::LaneDiagnostics;
use sketch_lanes::prelude::*;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Demo stub: paints a vertical two-lane road and runs the pipeline on it.
///
/// Usage: `sketch_lanes [config.json] [--json]`
fn run() -> Result<(), String> {
    let mut config_path = None;
    let mut json = false;
    for arg in env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            config_path = Some(arg);
        }
    }
    let params = match config_path {
        Some(path) => load_config(Path::new(&path)).map_err(|e| e.to_string())?,
        None => LaneParams::default(),
    };

    let (w, h) = (120usize, 160usize);
    let raster = painted_road(w, h);
    let input = RoadInput::new(0, vec![vec![[60.0, 0.0], [60.0, (h - 1) as f32]]], vec![14.0]);

    let pipeline = LanePipeline::new(params);
    let diag = pipeline
        .process_with_diagnostics(&input, ImageU8::new(w, h, &raster))
        .map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&diag)
            .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
        println!("{out}");
    } else {
        print_text_summary(&diag);
    }
    Ok(())
}

/// Solid edges two columns wide and a dashed centre line.
fn painted_road(w: usize, h: usize) -> Vec<u8> {
    let mut data = vec![0u8; w * h];
    for y in 0..h {
        for x in [48, 49, 71, 72] {
            data[y * w + x] = 255;
        }
        if y % 20 < 10 {
            data[y * w + 60] = 255;
        }
    }
    data
}

fn print_text_summary(diag: &LaneDiagnostics) {
    let report = &diag.report;
    println!("Lane summary");
    println!("  road: {:?}", report.kind);
    println!("  segments: {}", report.segments.len());
    for seg in &report.segments {
        println!(
            "  segment {} ({:?}) angle={:?} lines={}",
            seg.id,
            seg.kind,
            seg.angle,
            seg.lines.len()
        );
        for (i, line) in seg.lines.iter().enumerate() {
            println!(
                "    line {i}: {:?} {:?} peak={} width={}",
                line.num,
                line.pattern,
                line.peak,
                line.run_width()
            );
        }
        for lane in seg.lanes() {
            println!(
                "    lane {}-{}: width={:.1}",
                lane.left_line, lane.right_line, lane.width
            );
        }
    }
    for failure in &report.failures {
        println!(
            "  failed segment {} at {}: {}",
            failure.segment, failure.stage, failure.error
        );
    }
    println!("  total_ms: {:.3}", diag.trace.timings.total_ms);
    for stage in &diag.trace.timings.stages {
        println!("    {:<10} {:.3} ms", stage.label, stage.elapsed_ms);
    }
}
