mod common;

use common::synthetic_road::{init_logging, SketchRaster};
use sketch_lanes::prelude::*;

const W: usize = 100;
const H: usize = 120;

fn vertical_road() -> RoadInput {
    RoadInput::new(0, vec![vec![[50.0, 0.0], [50.0, (H - 1) as f32]]], vec![10.0])
}

fn run(params: LaneParams, input: &RoadInput, raster: &SketchRaster) -> LaneReport {
    LanePipeline::new(params)
        .process(input, raster.view())
        .expect("road metadata is valid")
}

fn patterns(seg: &Segment) -> Vec<MarkPattern> {
    seg.lines.iter().map(|l| l.pattern).collect()
}

#[test]
fn two_solid_edges_make_two_lines() {
    init_logging();
    let raster = SketchRaster::blank(W, H).solid_columns(&[42, 43, 57, 58]);
    let report = run(LaneParams::default(), &vertical_road(), &raster);

    assert_eq!(report.kind, RoadKind::Linear);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    let seg = &report.segments[0];
    assert_eq!(seg.angle, Some(0.0));
    assert!(seg.is_vertical && !seg.is_horizontal);
    assert_eq!(patterns(seg), vec![MarkPattern::Solid, MarkPattern::Solid]);
    assert!(seg.lines.iter().all(|l| l.num == LineNum::Single));
    assert!(seg.lines[0].peak < seg.lines[1].peak);

    let curves: Vec<_> = seg.lines.iter().map(|l| l.curve.as_ref().unwrap()).collect();
    for curve in &curves {
        assert_eq!(curve.len(), LaneParams::default().geometry.curve_points);
        let xs: Vec<f32> = curve.points().iter().map(|p| p[0]).collect();
        assert!(xs.iter().all(|x| (x - xs[0]).abs() < 1e-3), "curve is not vertical: {xs:?}");
        assert!((39.0..=61.0).contains(&xs[0]), "curve outside the road: {}", xs[0]);
    }
    let gap = curves[1].first()[0] - curves[0].first()[0];
    let peaks = (seg.lines[1].peak - seg.lines[0].peak) as f32;
    assert!((gap - peaks).abs() < 1e-3);

    let lanes = seg.lanes();
    assert_eq!(lanes.len(), 1);
    assert!((lanes[0].width - gap).abs() < 1e-3);
    let mid_x = (curves[0].first()[0] + curves[1].first()[0]) / 2.0;
    assert!(lanes[0].mid.points().iter().all(|p| (p[0] - mid_x).abs() < 1e-3));
}

#[test]
fn dashed_centre_line_is_voted_dashed() {
    let raster = SketchRaster::blank(W, H)
        .solid_columns(&[42, 43, 57, 58])
        .dashed_columns(&[50, 51], |y| y % 10 < 3);
    let mut params = LaneParams::default();
    params.scan.num_points = 40;
    let report = run(params, &vertical_road(), &raster);

    let seg = &report.segments[0];
    assert_eq!(
        patterns(seg),
        vec![MarkPattern::Solid, MarkPattern::Dashed, MarkPattern::Solid]
    );
    let xs: Vec<f32> = seg
        .lines
        .iter()
        .map(|l| l.curve.as_ref().unwrap().first()[0])
        .collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]), "lines out of order: {xs:?}");
}

#[test]
fn half_duty_centre_line_at_default_sampling() {
    // Twelve one-pixel samples see at most one dash of a long period.
    let cases = [
        (6, MarkPattern::Dotted),
        (10, MarkPattern::Dotted),
        (16, MarkPattern::Dashed),
        (20, MarkPattern::Solid),
    ];
    for (period, expected) in cases {
        let raster = SketchRaster::blank(W, H)
            .solid_columns(&[42, 43, 57, 58])
            .dashed_columns(&[50, 51], |y| y % period < period / 2);
        let report = run(LaneParams::default(), &vertical_road(), &raster);
        assert_eq!(
            patterns(&report.segments[0]),
            vec![MarkPattern::Solid, expected, MarkPattern::Solid],
            "period {period}"
        );
    }
}

#[test]
fn alternating_centre_line_is_dotted() {
    let raster = SketchRaster::blank(W, H)
        .solid_columns(&[42, 43, 57, 58])
        .dashed_columns(&[50, 51], |y| y % 2 == 0);
    let mut params = LaneParams::default();
    params.scan.num_points = 40;
    let report = run(params, &vertical_road(), &raster);
    assert_eq!(
        patterns(&report.segments[0]),
        vec![MarkPattern::Solid, MarkPattern::Dotted, MarkPattern::Solid]
    );
}

#[test]
fn wide_edges_read_as_double_lines() {
    let raster = SketchRaster::blank(W, H).solid_columns(&[42, 43, 44, 45, 54, 55, 56, 57]);
    let report = run(LaneParams::default(), &vertical_road(), &raster);
    let seg = &report.segments[0];
    assert_eq!(seg.lines.len(), 2);
    assert!(seg.lines.iter().all(|l| l.num == LineNum::Double));
    assert!(seg.lines.iter().all(|l| l.run_width() == 4));
}

#[test]
fn crossing_roads_are_trimmed_at_the_junction() {
    init_logging();
    let n = 120usize;
    let last = (n - 1) as f32;
    let raster = SketchRaster::blank(n, n)
        .solid_columns(&[52, 53, 66, 67])
        .solid_rows(&[52, 53, 66, 67]);
    let input = RoadInput::new(
        1,
        vec![
            vec![[0.0, 60.0], [last, 60.0]],
            vec![[60.0, 0.0], [60.0, last]],
        ],
        vec![10.0, 10.0],
    );
    let diag = LanePipeline::default()
        .process_with_diagnostics(&input, raster.view())
        .unwrap();
    let report = &diag.report;

    assert_eq!(report.kind, RoadKind::Intersection);
    assert_eq!(report.segments.len(), 2, "{:?}", report.failures);
    assert!(report.segments.iter().all(|s| s.lines.len() == 2));
    let overlap = diag.trace.overlap.as_ref().unwrap();
    assert_eq!(overlap.clipped_pairs, 1);
    // Every line crosses the other road and is split in two.
    assert!(report.is_approximate());

    let horizontal = report.segments.iter().find(|s| s.is_horizontal).unwrap();
    let vertical = report.segments.iter().find(|s| s.is_vertical).unwrap();
    let span = |seg: &Segment, axis: usize| {
        let vals: Vec<f32> = seg
            .lines
            .iter()
            .flat_map(|l| l.curve.as_ref().unwrap().points().iter().map(move |p| p[axis]))
            .collect();
        let lo = vals.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = vals.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (lo, hi)
    };
    let (vx0, vx1) = span(vertical, 0);
    let (hy0, hy1) = span(horizontal, 1);
    let outside = |v: f32, lo: f32, hi: f32| v <= lo + 1e-2 || v >= hi - 1e-2;

    for line in &horizontal.lines {
        let curve = line.curve.as_ref().unwrap();
        assert!(curve.length() < last - 10.0);
        assert!(curve.points().iter().all(|p| outside(p[0], vx0, vx1)));
    }
    for line in &vertical.lines {
        let curve = line.curve.as_ref().unwrap();
        assert!(curve.length() < last - 10.0);
        assert!(curve.points().iter().all(|p| outside(p[1], hy0, hy1)));
    }
}

#[test]
fn parallel_road_spans_the_image() {
    let (w, h) = (120usize, 100usize);
    let raster = SketchRaster::blank(w, h).solid_rows(&[44, 45, 55, 56]);
    let input = RoadInput::new(2, vec![vec![[40.0, 50.0], [80.0, 50.0]]], vec![8.0]);
    let report = run(LaneParams::default(), &input, &raster);

    assert_eq!(report.kind, RoadKind::Parallel);
    let seg = &report.segments[0];
    assert!(seg.is_horizontal);
    for boundary in [&seg.left_boundary, &seg.right_boundary] {
        let xs = [boundary.first()[0], boundary.last()[0]];
        assert!(xs.iter().any(|x| x.abs() < 1e-3), "{xs:?}");
        assert!(xs.iter().any(|x| (x - (w - 1) as f32).abs() < 1e-3), "{xs:?}");
    }

    assert_eq!(patterns(seg), vec![MarkPattern::Solid, MarkPattern::Solid]);
    for line in &seg.lines {
        let curve = line.curve.as_ref().unwrap();
        let ys: Vec<f32> = curve.points().iter().map(|p| p[1]).collect();
        assert!(ys.iter().all(|y| (y - ys[0]).abs() < 1e-2), "{ys:?}");
        assert!((41.0..=59.0).contains(&ys[0]), "{}", ys[0]);
        assert!(curve.length() > 100.0);
    }
}

#[test]
fn oblique_road_is_scanned_in_its_own_frame() {
    init_logging();
    let n = 160usize;
    let theta = 58f32.to_radians();
    let a = [30.0f32, 10.0];
    let b = [a[0] + 140.0 * theta.cos(), a[1] + 140.0 * theta.sin()];
    let raster = SketchRaster::blank(n, n)
        .band(a, b, -9.0, -7.0)
        .band(a, b, 7.0, 9.0);
    let input = RoadInput::new(0, vec![vec![a, b]], vec![10.0]);
    let report = run(LaneParams::default(), &input, &raster);

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    let seg = &report.segments[0];
    assert!(seg.is_vertical);
    let angle = seg.angle.unwrap();
    assert!((angle - 32.0).abs() < 0.1, "angle {angle}");
    assert_eq!(seg.lines.len(), 2, "{:?}", seg.lines);
    assert!(seg.lines[0].peak < seg.lines[1].peak);
    assert!(seg.lines.iter().all(|l| (2..=4).contains(&l.run_width())));

    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len = (dx * dx + dy * dy).sqrt();
    let signed = |p: &[f32; 2]| ((p[0] - a[0]) * -dy + (p[1] - a[1]) * dx) / len;
    let offsets: Vec<f32> = seg
        .lines
        .iter()
        .map(|l| {
            let curve = l.curve.as_ref().unwrap();
            let ds: Vec<f32> = curve.points().iter().map(signed).collect();
            assert!(ds.iter().all(|d| (d - ds[0]).abs() < 0.5), "curve not parallel: {ds:?}");
            ds[0]
        })
        .collect();
    // The first line sits on a road boundary, the second one stripe gap inward.
    assert!((offsets[0].abs() - 11.0).abs() < 0.5, "{offsets:?}");
    assert!(offsets[0] * offsets[1] < 0.0, "{offsets:?}");
    assert!(((offsets[0] - offsets[1]).abs() - 16.0).abs() <= 1.5, "{offsets:?}");

    let lanes = seg.lanes();
    assert_eq!(lanes.len(), 1);
    assert!((lanes[0].width - 16.0).abs() <= 1.5);
}
