//! Least-squares polynomial extrapolation of short baselines.
use super::Polyline;
use log::debug;
use nalgebra::{DMatrix, DVector};

/// Fits `s = c0 + c1·t + … + c_d·t^d` by normal equations.
/// Returns `None` when the system is singular.
pub fn polyfit(ts: &[f64], ss: &[f64], degree: usize) -> Option<Vec<f64>> {
    let n = ts.len().min(ss.len());
    let cols = degree + 1;
    if n < cols {
        return None;
    }
    let a = DMatrix::from_fn(n, cols, |r, c| ts[r].powi(c as i32));
    let b = DVector::from_column_slice(&ss[..n]);
    let at = a.transpose();
    let coeffs = (&at * &a).try_inverse()? * (at * b);
    Some(coeffs.iter().copied().collect())
}

fn eval(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Dominant axis of a curve's endpoint vector: `true` for `x`.
pub fn runs_along_x(pl: &Polyline) -> bool {
    let v = pl.endpoint_vector();
    v[0].abs() >= v[1].abs()
}

/// Re-samples a baseline across the whole image along its dominant axis
/// using a quadratic fit (linear when the baseline has too few distinct
/// abscissae). Travel direction is preserved.
pub fn extend_quadratic(pl: &Polyline, width: usize, height: usize, step: f32) -> Option<Polyline> {
    let along_x = runs_along_x(pl);
    let (ts, ss): (Vec<f64>, Vec<f64>) = pl
        .points()
        .iter()
        .map(|p| {
            if along_x {
                (p[0] as f64, p[1] as f64)
            } else {
                (p[1] as f64, p[0] as f64)
            }
        })
        .unzip();

    let mut distinct: Vec<i64> = ts.iter().map(|t| (t * 1e3).round() as i64).collect();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 2 {
        return None;
    }
    let degree = (distinct.len() - 1).min(2);
    let coeffs = polyfit(&ts, &ss, degree)?;
    debug!(
        "extend_quadratic: along_x={} degree={} coeffs={:?}",
        along_x, degree, coeffs
    );

    let dim = if along_x { width } else { height };
    let end = dim.saturating_sub(1) as f32;
    let step = if step > 0.0 { step } else { 4.0 };
    let mut samples: Vec<f32> = Vec::new();
    let mut t = 0.0f32;
    while t < end {
        samples.push(t);
        t += step;
    }
    samples.push(end);

    let ascending = {
        let v = pl.endpoint_vector();
        if along_x {
            v[0] >= 0.0
        } else {
            v[1] >= 0.0
        }
    };
    if !ascending {
        samples.reverse();
    }

    let pts = samples
        .into_iter()
        .map(|t| {
            let s = eval(&coeffs, t as f64) as f32;
            if along_x {
                [t, s]
            } else {
                [s, t]
            }
        })
        .collect();
    Polyline::new(pts)
}
