//! Quality indicators over archives: binary coverage and spread.
//!
//! Metrics on empty inputs are not errors; they return defined zero values
//! and emit a warning diagnostic.

use tracing::warn;

use crate::hypervolume;
use crate::model::Solution;
use crate::ranking::{self, Point};

/// Binary coverage C(A,B): the fraction of B weakly dominated by some
/// member of A. C(A,A) is 1; C on an empty B is 0 with a warning.
pub fn coverage(a: &[Point], b: &[Point]) -> f64 {
    if b.is_empty() {
        warn!("coverage requested against an empty archive");
        return 0.0;
    }
    let covered = b
        .iter()
        .filter(|q| a.iter().any(|p| ranking::weakly_dominates(p, q)))
        .count();
    covered as f64 / b.len() as f64
}

/// Spread of a front: mean-normalized absolute deviation of consecutive
/// Euclidean distances, with solutions ordered by the first objective.
///
/// Needs at least three solutions to be meaningful; smaller is more uniform.
pub fn spread(points: &[Point]) -> f64 {
    if points.len() < 2 {
        if points.is_empty() {
            warn!("spread requested on an empty archive");
        }
        return 0.0;
    }

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| points[a][0].total_cmp(&points[b][0]));

    let gaps: Vec<f64> = order
        .windows(2)
        .map(|pair| euclidean(&points[pair[0]], &points[pair[1]]))
        .collect();
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }

    let deviation: f64 = gaps.iter().map(|d| (d - mean).abs()).sum();
    deviation / (gaps.len() as f64 * mean)
}

fn euclidean(a: &Point, b: &Point) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// One row of the generation/iteration history both engines emit.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub front_size: usize,
    /// Hypervolume of the front, normalized against its own bounding box
    /// with the nadir plus one unit per objective as reference.
    pub hypervolume: f64,
    pub spread: f64,
    pub attractions_in_best: usize,
    pub neighborhoods_in_best: usize,
}

/// Summarize the current non-dominated front. "Best" is the member visiting
/// the most attractions, ties broken by neighborhood count.
pub fn generation_stats(generation: usize, front: &[Solution]) -> GenerationStats {
    let points: Vec<Point> = front.iter().map(|s| s.objectives.minimized()).collect();

    let hv = {
        let vectors: Vec<Vec<f64>> = points.iter().map(|p| p.to_vec()).collect();
        match hypervolume::ideal_and_nadir(&vectors) {
            Some((ideal, nadir)) => {
                let reference: Vec<f64> = nadir.iter().map(|v| v + 1.0).collect();
                let box_volume: f64 = reference
                    .iter()
                    .zip(&ideal)
                    .map(|(hi, lo)| hi - lo)
                    .product();
                if box_volume > 0.0 {
                    hypervolume::hypervolume(&vectors, &reference) / box_volume
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    };

    let best = front.iter().max_by_key(|s| {
        (s.objectives.attractions, s.objectives.neighborhoods)
    });

    GenerationStats {
        generation,
        front_size: front.len(),
        hypervolume: hv,
        spread: spread(&points),
        attractions_in_best: best.map_or(0, |s| s.objectives.attractions),
        neighborhoods_in_best: best.map_or(0, |s| s.objectives.neighborhoods),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p2(x: f64, y: f64) -> Point {
        [x, y, 0.0, 0.0]
    }

    #[test]
    fn test_coverage_of_self_is_one() {
        let a = vec![p2(1.0, 4.0), p2(3.0, 1.0)];
        assert_eq!(coverage(&a, &a), 1.0);
    }

    #[test]
    fn test_coverage_disjoint_fronts() {
        let a = vec![p2(1.0, 4.0), p2(3.0, 1.0)];
        let b = vec![p2(2.0, 3.0), p2(4.0, 2.0)];
        assert_eq!(coverage(&a, &b), 0.0);
        assert_eq!(coverage(&b, &a), 0.0);
    }

    #[test]
    fn test_coverage_partial() {
        let a = vec![p2(1.0, 1.0)];
        let b = vec![p2(2.0, 2.0), p2(0.5, 3.0)];
        assert_eq!(coverage(&a, &b), 0.5);
    }

    #[test]
    fn test_coverage_empty_b() {
        let a = vec![p2(1.0, 1.0)];
        assert_eq!(coverage(&a, &[]), 0.0);
    }

    #[test]
    fn test_spread_uniform_is_zero() {
        let points = vec![p2(0.0, 3.0), p2(1.0, 2.0), p2(2.0, 1.0), p2(3.0, 0.0)];
        assert!(spread(&points).abs() < 1e-12);
    }

    #[test]
    fn test_spread_uneven_is_positive() {
        let points = vec![p2(0.0, 3.0), p2(0.1, 2.9), p2(3.0, 0.0)];
        assert!(spread(&points) > 0.0);
    }

    #[test]
    fn test_spread_degenerate() {
        assert_eq!(spread(&[]), 0.0);
        assert_eq!(spread(&[p2(1.0, 1.0)]), 0.0);
        // Two identical points: zero mean gap
        assert_eq!(spread(&[p2(1.0, 1.0), p2(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_generation_stats() {
        use crate::model::{Itinerary, Objectives, Solution};

        let front = vec![
            Solution {
                itinerary: Itinerary::empty(),
                schedule: Vec::new(),
                objectives: Objectives {
                    cost: 10.0,
                    time: 200.0,
                    attractions: 3,
                    neighborhoods: 2,
                },
            },
            Solution {
                itinerary: Itinerary::empty(),
                schedule: Vec::new(),
                objectives: Objectives {
                    cost: 25.0,
                    time: 120.0,
                    attractions: 2,
                    neighborhoods: 2,
                },
            },
        ];
        let stats = generation_stats(7, &front);
        assert_eq!(stats.generation, 7);
        assert_eq!(stats.front_size, 2);
        assert_eq!(stats.attractions_in_best, 3);
        assert_eq!(stats.neighborhoods_in_best, 2);
        assert!(stats.hypervolume > 0.0 && stats.hypervolume <= 1.0);
    }

    #[test]
    fn test_generation_stats_empty_front() {
        let stats = generation_stats(0, &[]);
        assert_eq!(stats.front_size, 0);
        assert_eq!(stats.hypervolume, 0.0);
        assert_eq!(stats.attractions_in_best, 0);
    }
}
