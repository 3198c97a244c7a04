//! Exact hypervolume by slicing objectives (HSO).
//!
//! Measures the region a minimization point set dominates, bounded by a
//! reference point. Dimensions 1 and 2 are closed-form scans; higher
//! dimensions slice along the first objective and recurse on projections.

/// `a` dominates `b` for arbitrary-dimension minimization vectors.
fn dominates_nd(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Keep the non-dominated subset, dropping exact duplicates past the first.
fn non_dominated(points: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut kept: Vec<Vec<f64>> = Vec::new();
    for (i, p) in points.iter().enumerate() {
        let dominated = points
            .iter()
            .enumerate()
            .any(|(j, q)| j != i && dominates_nd(q, p));
        let duplicate = kept.iter().any(|q| q == p);
        if !dominated && !duplicate {
            kept.push(p.clone());
        }
    }
    kept
}

/// Exact hypervolume of `points` against `reference`.
///
/// Points that are not strictly better than the reference on every
/// objective enclose no volume and are ignored; if none remain the result
/// is 0. Deterministic for a given input ordering.
pub fn hypervolume(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let contributing: Vec<Vec<f64>> = points
        .iter()
        .filter(|p| p.iter().zip(reference).all(|(x, r)| x < r))
        .cloned()
        .collect();
    if contributing.is_empty() {
        return 0.0;
    }
    let front = non_dominated(&contributing);
    slice_volume(&front, reference)
}

fn slice_volume(front: &[Vec<f64>], reference: &[f64]) -> f64 {
    match reference.len() {
        0 => 0.0,
        1 => {
            // Single axis: the best point covers everything up to the bound.
            let best = front.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
            reference[0] - best
        }
        2 => sweep_2d(front, reference),
        _ => {
            let mut sorted: Vec<&Vec<f64>> = front.iter().collect();
            sorted.sort_by(|a, b| a[0].total_cmp(&b[0]));

            // The slab from p_i to the next first-objective value is covered
            // by the projections of every point at or before p_i.
            let mut volume = 0.0;
            for i in 0..sorted.len() {
                let slab_end = if i + 1 < sorted.len() {
                    sorted[i + 1][0]
                } else {
                    reference[0]
                };
                let width = slab_end - sorted[i][0];
                if width <= 0.0 {
                    continue;
                }
                let projected: Vec<Vec<f64>> =
                    sorted[..=i].iter().map(|p| p[1..].to_vec()).collect();
                let inner = non_dominated(&projected);
                volume += width * slice_volume(&inner, &reference[1..]);
            }
            volume
        }
    }
}

/// Stair-step area scan for the two-objective base case.
fn sweep_2d(front: &[Vec<f64>], reference: &[f64]) -> f64 {
    let mut sorted: Vec<&Vec<f64>> = front.iter().collect();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let mut area = 0.0;
    let mut best_y = reference[1];
    for p in sorted {
        if p[1] < best_y {
            area += (reference[0] - p[0]) * (best_y - p[1]);
            best_y = p[1];
        }
    }
    area
}

/// Hypervolume divided by the raw volume of the ideal/nadir bounding box.
///
/// Returns 0 when the box has no extent on some objective.
pub fn normalized_hypervolume(points: &[Vec<f64>], ideal: &[f64], nadir: &[f64]) -> f64 {
    let box_volume: f64 = ideal
        .iter()
        .zip(nadir)
        .map(|(lo, hi)| hi - lo)
        .product();
    if box_volume <= 0.0 {
        return 0.0;
    }
    hypervolume(points, nadir) / box_volume
}

/// Componentwise best and worst over a point set.
pub fn ideal_and_nadir(points: &[Vec<f64>]) -> Option<(Vec<f64>, Vec<f64>)> {
    let first = points.first()?;
    let mut ideal = first.clone();
    let mut nadir = first.clone();
    for p in &points[1..] {
        for (i, &value) in p.iter().enumerate() {
            ideal[i] = ideal[i].min(value);
            nadir[i] = nadir[i].max(value);
        }
    }
    Some((ideal, nadir))
}
