//! MOVNS: multi-objective variable neighborhood search.
//!
//! Keeps an approximation archive of pairwise non-dominated solutions and
//! perturbs not-fully-explored members through six neighborhood operators,
//! followed by a bounded first-improvement local search.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::archive::{self, Archive};
use crate::error::ConfigError;
use crate::evaluator::Evaluator;
use crate::metrics::{self, GenerationStats};
use crate::model::Solution;
use crate::ranking::{self, Point};

#[derive(Debug, Clone)]
pub struct MovnsParams {
    pub max_iterations: usize,
    pub max_time_seconds: u64,
    /// Stop after this many consecutive iterations without an archive gain.
    pub max_iterations_no_improvement: usize,
    /// Number of random solutions seeding the archive.
    pub initial_archive_size: usize,
    /// Bound on first-improvement steps after each shake.
    pub local_search_steps: usize,
    /// Optional ε-dominance grid capping the archive.
    pub epsilon: Option<Point>,
    /// Explicit seed for deterministic replay; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for MovnsParams {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_time_seconds: 300,
            max_iterations_no_improvement: 100,
            initial_archive_size: 20,
            local_search_steps: 10,
            epsilon: None,
            seed: None,
        }
    }
}

impl MovnsParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::new("max_iterations", "must be positive"));
        }
        if self.max_time_seconds == 0 {
            return Err(ConfigError::new("max_time_seconds", "must be positive"));
        }
        if self.max_iterations_no_improvement == 0 {
            return Err(ConfigError::new(
                "max_iterations_no_improvement",
                "must be positive",
            ));
        }
        if self.initial_archive_size == 0 {
            return Err(ConfigError::new("initial_archive_size", "must be positive"));
        }
        if let Some(epsilon) = &self.epsilon {
            if epsilon.iter().any(|&e| e <= 0.0) {
                return Err(ConfigError::new("epsilon", "components must be positive"));
            }
        }
        Ok(())
    }
}

/// The six local perturbation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    TransportModeChange,
    LocationReallocation,
    LocationExchange,
    SubsequenceInversion,
    LocationReplacement,
    AttractionRemoval,
}

impl Neighborhood {
    pub const ALL: [Neighborhood; 6] = [
        Neighborhood::TransportModeChange,
        Neighborhood::LocationReallocation,
        Neighborhood::LocationExchange,
        Neighborhood::SubsequenceInversion,
        Neighborhood::LocationReplacement,
        Neighborhood::AttractionRemoval,
    ];

    /// Produce a random evaluated neighbor, or `None` when the operator is
    /// not applicable to this itinerary (too short, nothing to replace).
    pub fn generate(
        self,
        solution: &Solution,
        evaluator: &Evaluator<'_>,
        rng: &mut ChaCha8Rng,
    ) -> Option<Solution> {
        let stops = &solution.itinerary.stops;
        let catalog = evaluator.attractions().len();
        match self {
            Neighborhood::TransportModeChange => {
                if solution.itinerary.modes.is_empty() {
                    return None;
                }
                let mut modes = solution.itinerary.modes.clone();
                let leg = rng.gen_range(0..modes.len());
                modes[leg] = modes[leg].toggled();
                Some(evaluator.evaluate_stops(stops.clone(), Some(modes)))
            }
            Neighborhood::LocationReallocation => {
                if stops.len() < 2 {
                    return None;
                }
                let mut next = stops.clone();
                let from = rng.gen_range(0..next.len());
                let stop = next.remove(from);
                let to = rng.gen_range(0..=next.len());
                next.insert(to, stop);
                Some(evaluator.evaluate_stops(next, None))
            }
            Neighborhood::LocationExchange => {
                if stops.len() < 2 {
                    return None;
                }
                let mut next = stops.clone();
                let i = rng.gen_range(0..next.len());
                let j = rng.gen_range(0..next.len());
                next.swap(i, j);
                Some(evaluator.evaluate_stops(next, None))
            }
            Neighborhood::SubsequenceInversion => {
                if stops.len() < 2 {
                    return None;
                }
                let mut next = stops.clone();
                let mut lo = rng.gen_range(0..next.len());
                let mut hi = rng.gen_range(0..next.len());
                if lo > hi {
                    std::mem::swap(&mut lo, &mut hi);
                }
                next[lo..=hi].reverse();
                Some(evaluator.evaluate_stops(next, None))
            }
            Neighborhood::LocationReplacement => {
                if stops.is_empty() || stops.len() >= catalog {
                    return None;
                }
                let absent: Vec<usize> = (0..catalog)
                    .filter(|candidate| !stops.contains(candidate))
                    .collect();
                let mut next = stops.clone();
                let position = rng.gen_range(0..next.len());
                next[position] = absent[rng.gen_range(0..absent.len())];
                Some(evaluator.evaluate_stops(next, None))
            }
            Neighborhood::AttractionRemoval => {
                if stops.len() <= 2 {
                    return None;
                }
                let mut next = stops.clone();
                next.remove(rng.gen_range(0..next.len()));
                Some(evaluator.evaluate_stops(next, None))
            }
        }
    }
}

/// Final archive and improvement history of one run.
#[derive(Debug, Clone)]
pub struct MovnsResult {
    pub archive: Archive,
    pub history: Vec<GenerationStats>,
}

/// Archive member plus its neighborhood exploration marks.
#[derive(Debug, Clone)]
struct Entry {
    solution: Solution,
    point: Point,
    explored: [bool; 6],
}

impl Entry {
    fn new(solution: Solution) -> Self {
        let point = solution.objectives.minimized();
        Self {
            solution,
            point,
            explored: [false; 6],
        }
    }

    fn fully_explored(&self) -> bool {
        self.explored.iter().all(|&mark| mark)
    }

    fn unexplored(&self) -> Vec<usize> {
        (0..Neighborhood::ALL.len())
            .filter(|&op| !self.explored[op])
            .collect()
    }
}

pub struct Movns<'a> {
    evaluator: &'a Evaluator<'a>,
    params: MovnsParams,
    rng: ChaCha8Rng,
    entries: Vec<Entry>,
}

impl<'a> Movns<'a> {
    pub fn new(evaluator: &'a Evaluator<'a>, params: MovnsParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            evaluator,
            params,
            rng,
            entries: Vec::new(),
        })
    }

    pub fn run(&mut self) -> MovnsResult {
        let mut history = Vec::new();
        if self.evaluator.attractions().is_empty() {
            info!("empty attraction catalog, nothing to optimize");
            return MovnsResult {
                archive: Archive::new(),
                history,
            };
        }

        info!(
            iterations = self.params.max_iterations,
            time_limit = self.params.max_time_seconds,
            "starting MOVNS"
        );

        self.entries.clear();
        for _ in 0..self.params.initial_archive_size {
            let stops = self.random_stops();
            let solution = self.evaluator.evaluate_stops(stops, None);
            self.insert(solution);
        }

        let deadline = Duration::from_secs(self.params.max_time_seconds);
        let start = Instant::now();
        let mut iterations = 0usize;
        let mut no_improvement = 0usize;

        loop {
            if iterations >= self.params.max_iterations {
                info!(iterations, "iteration limit reached");
                break;
            }
            if start.elapsed() >= deadline {
                info!(iterations, "time limit reached, returning current archive");
                break;
            }
            if no_improvement >= self.params.max_iterations_no_improvement {
                info!(iterations, no_improvement, "stagnated");
                break;
            }
            let candidates: Vec<usize> = (0..self.entries.len())
                .filter(|&index| !self.entries[index].fully_explored())
                .collect();
            let Some(&selected) = candidates.choose(&mut self.rng) else {
                info!(iterations, "archive fully explored");
                break;
            };

            let operators = self.entries[selected].unexplored();
            let operator = operators[self.rng.gen_range(0..operators.len())];
            self.entries[selected].explored[operator] = true;

            let base = self.entries[selected].solution.clone();
            let mut improved = false;
            if let Some(neighbor) =
                Neighborhood::ALL[operator].generate(&base, self.evaluator, &mut self.rng)
            {
                improved |= self.insert(neighbor.clone());
                improved |= self.local_search(neighbor);
            }

            iterations += 1;
            if improved {
                no_improvement = 0;
                let members: Vec<Solution> =
                    self.entries.iter().map(|e| e.solution.clone()).collect();
                let stats = metrics::generation_stats(iterations, &members);
                debug!(
                    iteration = iterations,
                    archive_size = stats.front_size,
                    hypervolume = stats.hypervolume,
                    "archive improved"
                );
                history.push(stats);
            } else {
                no_improvement += 1;
            }
        }

        let archive =
            Archive::from_solutions(self.entries.drain(..).map(|entry| entry.solution));
        info!(archive_size = archive.len(), "MOVNS finished");
        MovnsResult { archive, history }
    }

    /// Bounded first-improvement descent from `seed` over all neighborhoods.
    /// Every accepted step is offered to the archive.
    fn local_search(&mut self, seed: Solution) -> bool {
        let mut current = seed;
        let mut improved_archive = false;
        for _ in 0..self.params.local_search_steps {
            let operator = Neighborhood::ALL[self.rng.gen_range(0..Neighborhood::ALL.len())];
            let Some(candidate) = operator.generate(&current, self.evaluator, &mut self.rng)
            else {
                continue;
            };
            if ranking::dominates(
                &candidate.objectives.minimized(),
                &current.objectives.minimized(),
            ) {
                improved_archive |= self.insert(candidate.clone());
                current = candidate;
            }
        }
        improved_archive
    }

    /// Archive update: reject dominated or duplicate candidates, purge
    /// members the newcomer dominates, then apply the optional ε-grid cap.
    fn insert(&mut self, solution: Solution) -> bool {
        let point = solution.objectives.minimized();
        for entry in &self.entries {
            if entry.point == point || ranking::dominates(&entry.point, &point) {
                return false;
            }
        }
        self.entries
            .retain(|entry| !ranking::dominates(&point, &entry.point));
        self.entries.push(Entry::new(solution));

        if let Some(epsilon) = self.params.epsilon {
            self.epsilon_filter(&epsilon);
        }
        true
    }

    /// One representative per occupied ε-box (nearest the box center), then
    /// drop boxes ε-dominated by another occupied box.
    fn epsilon_filter(&mut self, epsilon: &Point) {
        if self.entries.len() < 2 {
            return;
        }

        let mut representatives: Vec<Entry> = Vec::new();
        for entry in self.entries.drain(..) {
            let entry_box = archive::box_index(&entry.point, epsilon);
            match representatives
                .iter_mut()
                .find(|existing| archive::box_index(&existing.point, epsilon) == entry_box)
            {
                Some(existing) => {
                    if archive::distance_to_box_center(&entry.point, epsilon)
                        < archive::distance_to_box_center(&existing.point, epsilon)
                    {
                        *existing = entry;
                    }
                }
                None => representatives.push(entry),
            }
        }

        let points: Vec<Point> = representatives.iter().map(|e| e.point).collect();
        self.entries = representatives
            .into_iter()
            .enumerate()
            .filter(|(index, entry)| {
                !points.iter().enumerate().any(|(other, other_point)| {
                    other != *index && archive::epsilon_dominates(other_point, &entry.point, epsilon)
                })
            })
            .map(|(_, entry)| entry)
            .collect();
    }

    /// Random permutation prefix of length within [2, catalog size].
    fn random_stops(&mut self) -> Vec<usize> {
        let catalog = self.evaluator.attractions().len();
        let mut order: Vec<usize> = (0..catalog).collect();
        order.shuffle(&mut self.rng);
        let shortest = 2.min(catalog);
        let length = if catalog <= shortest {
            catalog
        } else {
            self.rng.gen_range(shortest..=catalog)
        };
        order.truncate(length);
        order
    }
}
