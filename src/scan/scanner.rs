//! Column scanning over a segment's rotated ROI.
//!
//! The ROI is rotated so the midline runs down the canvas (`+y`). A probe is
//! the rotated midline, resampled at fixed arc steps and translated to start
//! at `(x, y0)`; sliding it across canvas columns and counting painted
//! samples turns each column into a [`WindowLine`] or background.
use super::roi;
use super::{dbscan::dbscan, WindowLine};
use crate::angle::scan_rotation_deg;
use crate::error::{LaneError, Stage};
use crate::geometry::Polyline;
use crate::image::{rotate_bound, GrayImageU8, ImageU8, ImageView, RotatedFrame};
use crate::params::{ClassifyParams, LaneParams, ParallelOptions, ScanParams};
use crate::segments::Segment;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Output of [`LineScanner::search_laneline`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnScan {
    pub segment: usize,
    /// Mapping between image coordinates and the rotated canvas.
    pub frame: RotatedFrame,
    /// Midline in canvas coordinates, resampled at the probe step.
    pub rotated_midline: Polyline,
    /// Probe origin row.
    pub origin_y: f32,
    /// First column whose probe lies fully right of the canvas edge.
    pub first_column: usize,
    /// First column that registered paint.
    pub fix_column: usize,
    /// Offset of the first painted sample in the fixing column's probe.
    pub starting_color_index: usize,
    pub columns_scanned: usize,
    /// Accepted columns by id, ascending.
    pub lines: BTreeMap<usize, WindowLine>,
    pub elapsed_ms: f64,
}

pub struct LineScanner {
    scan: ScanParams,
    classify: ClassifyParams,
    parallel: ParallelOptions,
}

impl LineScanner {
    pub fn new(params: &LaneParams) -> Self {
        Self {
            scan: params.scan.clone(),
            classify: params.classify.clone(),
            parallel: params.parallel.clone(),
        }
    }

    /// Scans with the configured probe size and outlier threshold.
    pub fn search_laneline(
        &self,
        segment: &Segment,
        raster: &ImageU8<'_>,
    ) -> Result<ColumnScan, LaneError> {
        self.search_laneline_with(
            segment,
            raster,
            self.scan.num_points,
            self.scan.outlier_threshold,
        )
    }

    pub fn search_laneline_with(
        &self,
        segment: &Segment,
        raster: &ImageU8<'_>,
        num_points: usize,
        outlier_threshold: f32,
    ) -> Result<ColumnScan, LaneError> {
        let start_time = Instant::now();
        let id = segment.id;
        let roi = roi::isolate(raster, &segment.polygon)
            .ok_or_else(|| LaneError::degenerate(id, Stage::Scan, "footprint outside raster"))?;

        let theta = segment.midline.endpoint_angle_deg();
        let angle = scan_rotation_deg(theta, self.scan.snap_tolerance_deg);
        let frame = RotatedFrame::new(
            angle,
            roi.origin,
            roi.image.width(),
            roi.image.height(),
        );
        let canvas = rotate_bound(&roi.image, &frame);
        let [width, height] = frame.dst_size;

        let rotated_midline = segment
            .midline
            .map(|p| frame.to_rotated(p))
            .resample_step(self.scan.sample_step);
        let origin_y = rotated_midline.first()[1].clamp(0.0, height.saturating_sub(1) as f32);

        let probe = Probe {
            canvas: &canvas,
            midline: &rotated_midline,
            origin_y,
        };
        let first_column = probe.first_column();
        if first_column >= width {
            return Err(LaneError::ScanExhaustion {
                segment: id,
                columns: 0,
            });
        }

        let num_points = num_points.max(1);
        let Some((fix_column, starting_color_index)) =
            (first_column..width).find_map(|x| probe.fix_offset(x, num_points))
        else {
            return Err(LaneError::ScanExhaustion {
                segment: id,
                columns: width - first_column,
            });
        };

        let window = Window {
            start: starting_color_index,
            len: num_points,
            outlier_threshold,
            min_samples: self.scan.outlier_min_samples,
            background_ratio: self.scan.background_ratio,
        };
        let columns: Vec<usize> = (fix_column..width).collect();
        let found = self.probe_columns(&probe, &window, &columns);
        let lines: BTreeMap<usize, WindowLine> = found.into_iter().map(|w| (w.id, w)).collect();
        if lines.is_empty() {
            return Err(LaneError::ScanExhaustion {
                segment: id,
                columns: columns.len(),
            });
        }

        let elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "LineScanner::search_laneline segment={} theta={:.1} angle={:.1} canvas={}x{} first={} fix={} start={} lines={} elapsed={:.3}ms",
            id,
            theta,
            angle,
            width,
            height,
            first_column,
            fix_column,
            starting_color_index,
            lines.len(),
            elapsed_ms
        );

        Ok(ColumnScan {
            segment: id,
            frame,
            rotated_midline,
            origin_y,
            first_column,
            fix_column,
            starting_color_index,
            columns_scanned: columns.len(),
            lines,
            elapsed_ms,
        })
    }

    fn probe_columns(&self, probe: &Probe<'_>, window: &Window, columns: &[usize]) -> Vec<WindowLine> {
        if self.parallel.columns(columns.len()) {
            #[cfg(feature = "parallel")]
            {
                return probe_columns_parallel(probe, window, columns, &self.classify);
            }
        }
        columns
            .iter()
            .filter_map(|&x| probe.window_line(x, window, &self.classify))
            .collect()
    }
}

#[cfg(feature = "parallel")]
fn probe_columns_parallel(
    probe: &Probe<'_>,
    window: &Window,
    columns: &[usize],
    classify: &ClassifyParams,
) -> Vec<WindowLine> {
    use rayon::prelude::*;

    columns
        .par_iter()
        .filter_map(|&x| probe.window_line(x, window, classify))
        .collect()
}

/// Sample selection shared by every column once the offset is fixed.
struct Window {
    start: usize,
    len: usize,
    outlier_threshold: f32,
    min_samples: usize,
    background_ratio: f32,
}

/// Read-only view of the canvas and the probe template.
struct Probe<'a> {
    canvas: &'a GrayImageU8,
    midline: &'a Polyline,
    origin_y: f32,
}

impl Probe<'_> {
    /// Smallest column whose translated probe has no point left of `x = 0`.
    fn first_column(&self) -> usize {
        let x0 = self.midline.first()[0];
        let min_dx = self
            .midline
            .points()
            .iter()
            .map(|p| p[0] - x0)
            .fold(0.0f32, f32::min);
        // Probe points sit at column centres (x + 0.5).
        (-(min_dx + 0.5)).ceil().max(0.0) as usize
    }

    /// In-bounds samples of the probe translated to column `x`.
    fn samples(&self, x: usize) -> Vec<([f32; 2], u8)> {
        let shifted = self
            .midline
            .translate_to([x as f32 + 0.5, self.origin_y + 0.5]);
        shifted
            .points()
            .iter()
            .filter_map(|&p| self.canvas.sample(p).map(|v| (p, v)))
            .collect()
    }

    /// `(x, index of first painted sample)` when the first `n` samples of
    /// column `x` carry paint.
    fn fix_offset(&self, x: usize, n: usize) -> Option<(usize, usize)> {
        let samples = self.samples(x);
        samples
            .iter()
            .take(n)
            .position(|&(_, v)| v > 0)
            .map(|start| (x, start))
    }

    fn window_line(&self, x: usize, window: &Window, params: &ClassifyParams) -> Option<WindowLine> {
        let mut samples: Vec<([f32; 2], u8)> = self
            .samples(x)
            .into_iter()
            .skip(window.start)
            .take(window.len)
            .collect();
        if window.outlier_threshold > 0.0 {
            samples = reject_outliers(samples, window.outlier_threshold, window.min_samples);
        }
        if samples.is_empty() {
            return None;
        }
        let total: u32 = samples.iter().map(|&(_, v)| v as u32).sum();
        let zeros = samples.iter().filter(|&&(_, v)| v == 0).count();
        let zero_ratio = zeros as f32 / samples.len() as f32;
        if total == 0 || zero_ratio >= window.background_ratio {
            return None;
        }
        let points = samples.into_iter().map(|(p, _)| p).collect();
        Some(WindowLine::new(x, points, total, zero_ratio, params))
    }
}

/// Drops painted samples DBSCAN labels as noise; background samples stay.
fn reject_outliers(
    samples: Vec<([f32; 2], u8)>,
    eps: f32,
    min_samples: usize,
) -> Vec<([f32; 2], u8)> {
    let painted: Vec<[f32; 2]> = samples
        .iter()
        .filter(|&&(_, v)| v > 0)
        .map(|&(p, _)| p)
        .collect();
    let labels = dbscan(&painted, eps, min_samples);
    let mut painted_idx = 0;
    samples
        .into_iter()
        .filter(|&(_, v)| {
            if v == 0 {
                return true;
            }
            let keep = labels[painted_idx].is_some();
            painted_idx += 1;
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::SegmentKind;

    fn vertical_road(raster_h: usize) -> Segment {
        let mid = Polyline::new(vec![[50.0, 0.0], [50.0, (raster_h - 1) as f32]]).unwrap();
        Segment::offset_from_midline(0, SegmentKind::Linear, mid, 10.0, 1e-3).unwrap()
    }

    fn paint_columns(w: usize, h: usize, cols: &[usize]) -> Vec<u8> {
        let mut data = vec![0u8; w * h];
        for y in 0..h {
            for &x in cols {
                data[y * w + x] = 255;
            }
        }
        data
    }

    #[test]
    fn blank_road_is_scan_exhaustion() {
        let (w, h) = (100usize, 120usize);
        let data = vec![0u8; w * h];
        let raster = ImageU8::new(w, h, &data);
        let scanner = LineScanner::new(&LaneParams::default());
        let err = scanner
            .search_laneline(&vertical_road(h), &raster)
            .unwrap_err();
        assert!(matches!(err, LaneError::ScanExhaustion { segment: 0, .. }));
    }

    #[test]
    fn painted_columns_are_found_in_order() {
        let (w, h) = (100usize, 120usize);
        let data = paint_columns(w, h, &[42, 43, 57, 58]);
        let raster = ImageU8::new(w, h, &data);
        let scanner = LineScanner::new(&LaneParams::default());
        let scan = scanner
            .search_laneline(&vertical_road(h), &raster)
            .unwrap();
        assert_eq!(scan.frame.angle_deg, 0.0);
        let ids: Vec<usize> = scan.lines.keys().copied().collect();
        assert_eq!(ids, vec![3, 4, 18, 19]);
        assert_eq!(scan.starting_color_index, 0);
        for wl in scan.lines.values() {
            assert_eq!(wl.zero_ratio, 0.0);
            assert_eq!(wl.points.len(), 12);
        }
    }

    #[test]
    fn scan_outlier_threshold_drops_sparse_specks() {
        let (w, h) = (100usize, 120usize);
        let mut data = paint_columns(w, h, &[42, 43]);
        for y in [0usize, 4, 8] {
            data[y * w + 50] = 255;
        }
        let raster = ImageU8::new(w, h, &data);
        let scanner = LineScanner::new(&LaneParams::default());
        let road = vertical_road(h);

        let kept = scanner.search_laneline_with(&road, &raster, 12, 0.0).unwrap();
        let speck = kept.lines.get(&11).expect("speck column is scanned");
        assert!((speck.zero_ratio - 0.75).abs() < 1e-6);

        let filtered = scanner.search_laneline_with(&road, &raster, 12, 1.5).unwrap();
        let ids: Vec<usize> = filtered.lines.keys().copied().collect();
        assert_eq!(ids, vec![3, 4]);
        for scan in [&kept, &filtered] {
            assert!(scan
                .lines
                .values()
                .all(|wl| (0.0..=1.0).contains(&wl.zero_ratio)));
        }
        assert!(filtered.lines.values().all(|wl| wl.points.len() == 12));
    }

    #[test]
    fn outlier_rejection_drops_isolated_paint() {
        let samples: Vec<([f32; 2], u8)> = (0..10)
            .map(|i| ([5.5, i as f32 + 0.5], if i < 6 || i == 9 { 200 } else { 0 }))
            .collect();
        let kept = reject_outliers(samples, 1.5, 3);
        assert_eq!(kept.len(), 9);
        assert_eq!(kept.iter().filter(|s| s.1 > 0).count(), 6);
    }
}
