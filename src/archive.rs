//! Non-dominated approximation archive.
//!
//! The archive owns its solutions; iteration order is insertion order so
//! reports are reproducible. Insertion keeps the member set pairwise
//! non-dominated and free of exact objective-vector duplicates.

use crate::model::Solution;
use crate::ranking::{self, Point};

/// ε-dominance on the discretized grid: `a` ε-dominates `b` when a's box
/// index is componentwise no larger and strictly smaller somewhere.
pub fn epsilon_dominates(a: &Point, b: &Point, epsilon: &Point) -> bool {
    let box_a = box_index(a, epsilon);
    let box_b = box_index(b, epsilon);
    let mut strictly_less = false;
    for i in 0..box_a.len() {
        if box_a[i] > box_b[i] {
            return false;
        }
        if box_a[i] < box_b[i] {
            strictly_less = true;
        }
    }
    strictly_less
}

pub(crate) fn box_index(point: &Point, epsilon: &Point) -> [i64; 4] {
    let mut index = [0i64; 4];
    for i in 0..4 {
        index[i] = (point[i] / epsilon[i]).floor() as i64;
    }
    index
}

pub(crate) fn distance_to_box_center(point: &Point, epsilon: &Point) -> f64 {
    let index = box_index(point, epsilon);
    let mut sum = 0.0;
    for i in 0..4 {
        let center = (index[i] as f64 + 0.5) * epsilon[i];
        sum += (point[i] - center).powi(2);
    }
    sum.sqrt()
}

/// Set of pairwise non-dominated solutions.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    members: Vec<Solution>,
}

impl Archive {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[Solution] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Solution> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Minimization vectors of all members, in archive order.
    pub fn points(&self) -> Vec<Point> {
        self.members
            .iter()
            .map(|s| s.objectives.minimized())
            .collect()
    }

    /// Insert unless dominated by or identical to an existing member.
    /// On success, members the candidate dominates are purged.
    ///
    /// Returns whether the archive changed.
    pub fn try_insert(&mut self, candidate: Solution) -> bool {
        let point = candidate.objectives.minimized();
        for member in &self.members {
            let existing = member.objectives.minimized();
            if existing == point || ranking::dominates(&existing, &point) {
                return false;
            }
        }
        self.members
            .retain(|member| !ranking::dominates(&point, &member.objectives.minimized()));
        self.members.push(candidate);
        true
    }

    /// Build an archive from evaluated solutions, keeping non-dominated ones.
    pub fn from_solutions(solutions: impl IntoIterator<Item = Solution>) -> Self {
        let mut archive = Self::new();
        for solution in solutions {
            archive.try_insert(solution);
        }
        archive
    }

    /// Cap the archive on the ε-grid: one representative per occupied box
    /// (the member nearest the box center), then drop boxes that another
    /// occupied box ε-dominates.
    pub fn epsilon_filter(&mut self, epsilon: &Point) {
        if self.members.len() < 2 {
            return;
        }

        let mut representatives: Vec<Solution> = Vec::new();
        for member in self.members.drain(..) {
            let member_box = box_index(&member.objectives.minimized(), epsilon);
            match representatives.iter_mut().find(|existing| {
                box_index(&existing.objectives.minimized(), epsilon) == member_box
            }) {
                Some(existing) => {
                    let existing_distance =
                        distance_to_box_center(&existing.objectives.minimized(), epsilon);
                    let member_distance =
                        distance_to_box_center(&member.objectives.minimized(), epsilon);
                    if member_distance < existing_distance {
                        *existing = member;
                    }
                }
                None => representatives.push(member),
            }
        }

        let points: Vec<Point> = representatives
            .iter()
            .map(|s| s.objectives.minimized())
            .collect();
        self.members = representatives
            .into_iter()
            .enumerate()
            .filter(|(i, solution)| {
                let point = solution.objectives.minimized();
                !points
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != *i && epsilon_dominates(other, &point, epsilon))
            })
            .map(|(_, solution)| solution)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Itinerary, Objectives};

    fn solution(cost: f64, time: f64, attractions: usize, neighborhoods: usize) -> Solution {
        Solution {
            itinerary: Itinerary::empty(),
            schedule: Vec::new(),
            objectives: Objectives {
                cost,
                time,
                attractions,
                neighborhoods,
            },
        }
    }

    #[test]
    fn test_insert_and_purge() {
        let mut archive = Archive::new();
        assert!(archive.try_insert(solution(10.0, 100.0, 2, 1)));
        assert!(archive.try_insert(solution(20.0, 50.0, 2, 1)));
        assert_eq!(archive.len(), 2);

        // Dominates the first member, purges it
        assert!(archive.try_insert(solution(5.0, 90.0, 3, 2)));
        assert_eq!(archive.len(), 2);
        assert!(
            archive
                .members()
                .iter()
                .all(|s| s.objectives.cost != 10.0)
        );
    }

    #[test]
    fn test_dominated_candidate_rejected() {
        let mut archive = Archive::new();
        archive.try_insert(solution(10.0, 100.0, 3, 2));
        assert!(!archive.try_insert(solution(15.0, 110.0, 2, 1)));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_duplicate_objectives_rejected() {
        let mut archive = Archive::new();
        archive.try_insert(solution(10.0, 100.0, 2, 1));
        assert!(!archive.try_insert(solution(10.0, 100.0, 2, 1)));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut archive = Archive::new();
        archive.try_insert(solution(10.0, 100.0, 2, 2));
        archive.try_insert(solution(20.0, 50.0, 2, 2));
        archive.try_insert(solution(30.0, 25.0, 2, 2));
        let costs: Vec<f64> = archive.members().iter().map(|s| s.objectives.cost).collect();
        assert_eq!(costs, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_epsilon_dominance() {
        let epsilon = [10.0, 10.0, 1.0, 1.0];
        // Same box: neither dominates
        assert!(!epsilon_dominates(
            &[11.0, 11.0, -1.0, -1.0],
            &[19.0, 19.0, -1.0, -1.0],
            &epsilon
        ));
        // Lower box on cost
        assert!(epsilon_dominates(
            &[9.0, 11.0, -1.0, -1.0],
            &[19.0, 19.0, -1.0, -1.0],
            &epsilon
        ));
    }

    #[test]
    fn test_epsilon_filter_keeps_one_per_box() {
        let mut archive = Archive::new();
        // Mutually non-dominated but in the same ε-box on cost/time
        archive.try_insert(solution(11.0, 19.0, 2, 2));
        archive.try_insert(solution(14.0, 16.0, 2, 2));
        // A far box that survives on its own
        archive.try_insert(solution(95.0, 1.0, 2, 2));
        archive.epsilon_filter(&[10.0, 10.0, 1.0, 1.0]);
        assert_eq!(archive.len(), 2);
        // (14,16) is nearest the (15,15) box center
        assert!(
            archive
                .members()
                .iter()
                .any(|s| s.objectives.cost == 14.0)
        );
    }
}
