//! Intersection → parallel reclassification.
use super::{Baseline, RoadLayout};
use crate::angle::angle_between_deg;
use log::debug;

/// Walks adjacent baseline pairs of an intersection. A pair within `tol_deg`
/// of aligned is compatible; a pair within `tol_deg` of anti-parallel is made
/// compatible by reversing the later baseline. When every pair is compatible
/// the road collapses to a parallel road on its longest baseline.
pub fn refine_roadlanes(mut baselines: Vec<Baseline>, tol_deg: f32) -> RoadLayout {
    if baselines.len() < 2 {
        return RoadLayout::Intersection(baselines);
    }

    let mut all_compatible = true;
    for i in 0..baselines.len() - 1 {
        let (Some(a), Some(b)) = (
            baselines[i].endpoint_vector(),
            baselines[i + 1].endpoint_vector(),
        ) else {
            all_compatible = false;
            continue;
        };
        let angle = angle_between_deg(&a, &b);
        if angle <= tol_deg {
            continue;
        }
        if angle >= 180.0 - tol_deg {
            debug!(
                "refine_roadlanes: reversing baseline {} (anti-parallel, {:.1}°)",
                baselines[i + 1].id,
                angle
            );
            baselines[i + 1].reverse();
            continue;
        }
        all_compatible = false;
    }

    if all_compatible {
        let rep = representative(baselines);
        debug!(
            "refine_roadlanes: collapsed to parallel road on baseline {}",
            rep.id
        );
        RoadLayout::Parallel(rep)
    } else {
        RoadLayout::Intersection(baselines)
    }
}

/// Longest baseline by nominal length (arc length when unknown).
/// Ties keep the earliest.
pub(crate) fn representative(baselines: Vec<Baseline>) -> Baseline {
    let mut best: Option<Baseline> = None;
    for b in baselines {
        match &best {
            Some(cur) if cur.effective_length() >= b.effective_length() => {}
            _ => best = Some(b),
        }
    }
    best.unwrap_or(Baseline {
        id: 0,
        points: Vec::new(),
        half_width: 0.0,
        length: None,
    })
}
