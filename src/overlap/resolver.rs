//! Pairwise clipping of junction curves against neighbouring footprints.
//!
//! For every unordered pair of bundles whose footprints overlap, each bundle's
//! curves are cut by the other's footprint. Across all pairings a bundle
//! keeps, per curve role, the shortest variant seen. Junctions where three or
//! more footprints overlap are resolved pairwise only, so the result there is
//! an approximation.
use super::bundle::{CurveBundle, CurveRole};
use crate::error::LaneError;
use crate::geometry::{Footprint, Polyline};
use geo::{BooleanOps, Intersects, MultiLineString, Polygon};
use log::{debug, warn};
use serde::Serialize;
use std::time::Instant;

/// Why a resolved curve is only approximate.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Approximation {
    /// The clip split the curve; the longest piece was kept.
    MultiPart { parts: usize },
    /// The neighbour swallowed the whole curve; it was kept unchanged.
    Swallowed,
    /// The bundle's footprint is not a simple polygon; the pair was skipped.
    InvalidFootprint,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapFlag {
    pub segment: usize,
    pub against: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<CurveRole>,
    pub approximation: Approximation,
}

impl OverlapFlag {
    /// The recoverable error this flag stands for, if any.
    pub fn to_error(&self) -> Option<LaneError> {
        match self.approximation {
            Approximation::MultiPart { parts } => Some(LaneError::OverlapClipAmbiguity {
                segment: self.segment,
                parts,
            }),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapOutcome {
    pub bundles: Vec<CurveBundle>,
    pub flags: Vec<OverlapFlag>,
    /// Pairs whose footprints overlapped.
    pub clipped_pairs: usize,
    pub elapsed_ms: f64,
}

enum Clip {
    Unchanged,
    Trimmed(Polyline, usize),
    Swallowed,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OverlapResolver;

impl OverlapResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, bundles: &[CurveBundle]) -> OverlapOutcome {
        let start = Instant::now();
        let mut best: Vec<CurveBundle> = bundles.to_vec();
        let mut flags: Vec<OverlapFlag> = Vec::new();
        if bundles.len() < 2 {
            return OverlapOutcome {
                bundles: best,
                flags,
                clipped_pairs: 0,
                elapsed_ms: 0.0,
            };
        }

        let footprints: Vec<Option<Polygon<f64>>> = bundles
            .iter()
            .map(|b| {
                let fp = Footprint::from_boundaries(&b.left, &b.right);
                if fp.is_simple() {
                    Some(fp.to_geo())
                } else {
                    warn!(
                        "OverlapResolver: footprint of segment {} is not simple, skipping its pairs",
                        b.segment
                    );
                    None
                }
            })
            .collect();

        let mut clipped_pairs = 0usize;
        for i in 0..bundles.len() {
            for j in i + 1..bundles.len() {
                let (Some(pi), Some(pj)) = (&footprints[i], &footprints[j]) else {
                    let bad = if footprints[i].is_none() { i } else { j };
                    let other = if bad == i { j } else { i };
                    flags.push(OverlapFlag {
                        segment: bundles[bad].segment,
                        against: bundles[other].segment,
                        role: None,
                        approximation: Approximation::InvalidFootprint,
                    });
                    continue;
                };
                if !pi.intersects(pj) {
                    continue;
                }
                clipped_pairs += 1;
                clip_into(&bundles[i], pj, bundles[j].segment, &mut best[i], &mut flags);
                clip_into(&bundles[j], pi, bundles[i].segment, &mut best[j], &mut flags);
            }
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "OverlapResolver::resolve bundles={} pairs={} flags={} elapsed={:.3}ms",
            bundles.len(),
            clipped_pairs,
            flags.len(),
            elapsed_ms
        );
        OverlapOutcome {
            bundles: best,
            flags,
            clipped_pairs,
            elapsed_ms,
        }
    }
}

/// Clips every curve of `source` by `other` and keeps the shorter variant in
/// `best`.
fn clip_into(
    source: &CurveBundle,
    other: &Polygon<f64>,
    against: usize,
    best: &mut CurveBundle,
    flags: &mut Vec<OverlapFlag>,
) {
    for role in source.roles() {
        let Some(curve) = source.get(role) else {
            continue;
        };
        let clipped = match clip_curve(curve, other) {
            Clip::Unchanged => continue,
            Clip::Swallowed => {
                flags.push(OverlapFlag {
                    segment: source.segment,
                    against,
                    role: Some(role),
                    approximation: Approximation::Swallowed,
                });
                continue;
            }
            Clip::Trimmed(piece, parts) => {
                if parts > 1 {
                    warn!(
                        "OverlapResolver: segment {} {:?} split into {} parts by segment {}, keeping the longest",
                        source.segment, role, parts, against
                    );
                    flags.push(OverlapFlag {
                        segment: source.segment,
                        against,
                        role: Some(role),
                        approximation: Approximation::MultiPart { parts },
                    });
                }
                piece
            }
        };
        let shorter = best
            .get(role)
            .map_or(true, |cur| clipped.length() < cur.length());
        if shorter {
            best.set(role, clipped);
        }
    }
}

/// Part of `curve` outside `polygon`, longest piece when it splits.
fn clip_curve(curve: &Polyline, polygon: &Polygon<f64>) -> Clip {
    let ls = curve.to_geo();
    if !polygon.intersects(&ls) {
        return Clip::Unchanged;
    }
    let outside = polygon.clip(&MultiLineString::new(vec![ls]), true);
    let pieces: Vec<Polyline> = outside.0.iter().filter_map(Polyline::from_geo).collect();
    let parts = pieces.len();
    let longest = pieces.into_iter().fold(None::<Polyline>, |acc, p| match acc {
        Some(best) if best.length() >= p.length() => Some(best),
        _ => Some(p),
    });
    match longest {
        Some(piece) => Clip::Trimmed(piece, parts),
        None => Clip::Swallowed,
    }
}
