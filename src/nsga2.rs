//! NSGA-II: elitist multi-objective genetic search over itineraries.
//!
//! Chromosomes are permutation prefixes over the attraction catalog with a
//! parallel transport-mode vector. Timing is always derived by the
//! evaluator; operators never touch schedules directly.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::archive::Archive;
use crate::error::ConfigError;
use crate::evaluator::Evaluator;
use crate::metrics::{self, GenerationStats};
use crate::model::{Solution, TransportMode};
use crate::ranking::{self, Point};

#[derive(Debug, Clone)]
pub struct NsgaParams {
    pub population_size: usize,
    pub max_generations: usize,
    /// Probability of producing a child by ordered crossover rather than
    /// cloning a parent.
    pub crossover_rate: f64,
    /// Per-gene probability of a mutation event.
    pub mutation_rate: f64,
    /// Explicit seed for deterministic replay; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for NsgaParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 100,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            seed: None,
        }
    }
}

impl NsgaParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::new("population_size", "must be positive"));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::new("max_generations", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::new("crossover_rate", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::new("mutation_rate", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Final front and per-generation history of one run.
#[derive(Debug, Clone)]
pub struct NsgaResult {
    pub archive: Archive,
    pub history: Vec<GenerationStats>,
}

#[derive(Debug, Clone)]
struct Individual {
    solution: Solution,
    rank: usize,
    crowding: f64,
}

impl Individual {
    fn point(&self) -> Point {
        self.solution.objectives.minimized()
    }
}

pub struct Nsga2<'a> {
    evaluator: &'a Evaluator<'a>,
    params: NsgaParams,
    rng: ChaCha8Rng,
}

impl<'a> Nsga2<'a> {
    pub fn new(evaluator: &'a Evaluator<'a>, params: NsgaParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            evaluator,
            params,
            rng,
        })
    }

    pub fn run(&mut self) -> NsgaResult {
        self.run_with_cancel(&AtomicBool::new(false))
    }

    /// Evolve until `max_generations` or until `cancel` is raised; canceling
    /// returns the best front found so far.
    pub fn run_with_cancel(&mut self, cancel: &AtomicBool) -> NsgaResult {
        let mut history = Vec::new();
        if self.evaluator.attractions().is_empty() {
            info!("empty attraction catalog, nothing to optimize");
            return NsgaResult {
                archive: Archive::new(),
                history,
            };
        }

        info!(
            population = self.params.population_size,
            generations = self.params.max_generations,
            "starting NSGA-II"
        );

        let evaluator = self.evaluator;
        let initial: Vec<Vec<usize>> = (0..self.params.population_size)
            .map(|_| self.random_stops())
            .collect();
        let mut parents: Vec<Individual> = initial
            .into_par_iter()
            .map(|stops| Individual {
                solution: evaluator.evaluate_stops(stops, None),
                rank: 0,
                crowding: 0.0,
            })
            .collect();
        rank_population(&mut parents);
        let mut best_front: Vec<Solution> = parents
            .iter()
            .filter(|individual| individual.rank == 0)
            .map(|individual| individual.solution.clone())
            .collect();

        for generation in 1..=self.params.max_generations {
            if cancel.load(Ordering::Relaxed) {
                info!(generation, "canceled, returning best front so far");
                break;
            }

            let genomes = self.create_offspring(&parents);
            let offspring: Vec<Individual> = genomes
                .into_par_iter()
                .map(|(stops, modes)| Individual {
                    solution: evaluator.evaluate_stops(stops, Some(modes)),
                    rank: 0,
                    crowding: 0.0,
                })
                .collect();

            let mut combined = parents;
            combined.extend(offspring);
            rank_population(&mut combined);

            // The first front of the combined population, before any
            // crowding truncation, is what the run ultimately reports.
            best_front = combined
                .iter()
                .filter(|individual| individual.rank == 0)
                .map(|individual| individual.solution.clone())
                .collect();
            parents = self.select_survivors(combined);

            let stats = metrics::generation_stats(generation, &best_front);
            debug!(
                generation,
                front_size = stats.front_size,
                hypervolume = stats.hypervolume,
                "generation complete"
            );
            history.push(stats);
        }

        let archive = Archive::from_solutions(best_front);
        info!(front_size = archive.len(), "NSGA-II finished");
        NsgaResult { archive, history }
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

    fn create_offspring(
        &mut self,
        parents: &[Individual],
    ) -> Vec<(Vec<usize>, Vec<TransportMode>)> {
        (0..self.params.population_size)
            .map(|_| {
                let first = self.tournament(parents);
                let second = self.tournament(parents);
                let mut stops = if self.rng.gen_bool(self.params.crossover_rate) {
                    self.order_crossover(
                        &parents[first].solution.itinerary.stops,
                        &parents[second].solution.itinerary.stops,
                    )
                } else {
                    parents[first].solution.itinerary.stops.clone()
                };
                self.repair(&mut stops);
                let mut modes = self.evaluator.default_modes(&stops);
                self.mutate(&mut stops, &mut modes);
                (stops, modes)
            })
            .collect()
    }

    /// Binary tournament by crowded comparison; the first pick wins ties.
    fn tournament(&mut self, parents: &[Individual]) -> usize {
        let first = self.rng.gen_range(0..parents.len());
        let second = self.rng.gen_range(0..parents.len());
        if ranking::crowded_less(
            parents[second].rank,
            parents[second].crowding,
            parents[first].rank,
            parents[first].crowding,
        ) {
            second
        } else {
            first
        }
    }

    /// Ordered crossover: copy a slice of the first parent, fill remaining
    /// positions with the second parent's genes in order, then with the
    /// first parent's unused genes. Child length equals the first parent's.
    fn order_crossover(&mut self, a: &[usize], b: &[usize]) -> Vec<usize> {
        let n = a.len();
        if n < 2 {
            return a.to_vec();
        }
        let mut lo = self.rng.gen_range(0..n);
        let mut hi = self.rng.gen_range(0..n);
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }

        let mut child: Vec<Option<usize>> = vec![None; n];
        let mut present: HashSet<usize> = HashSet::with_capacity(n);
        for i in lo..=hi {
            child[i] = Some(a[i]);
            present.insert(a[i]);
        }

        let mut fill: Vec<usize> = Vec::with_capacity(n);
        for &gene in b.iter().chain(a.iter()) {
            if !present.contains(&gene) && !fill.contains(&gene) {
                fill.push(gene);
            }
        }
        let mut fill = fill.into_iter();
        for slot in child.iter_mut() {
            if slot.is_none() {
                *slot = fill.next();
            }
        }
        child.into_iter().flatten().collect()
    }

    /// Keep the first occurrence of duplicated genes; regenerate chromosomes
    /// that fall under the minimum length.
    fn repair(&mut self, stops: &mut Vec<usize>) {
        let mut seen = HashSet::with_capacity(stops.len());
        stops.retain(|gene| seen.insert(*gene));
        let catalog = self.evaluator.attractions().len();
        if stops.len() < 2.min(catalog) {
            *stops = self.random_stops();
        }
    }

    /// Per-gene mutation events; each event applies one of swap, insert,
    /// remove, or transport flip chosen uniformly. Structural edits rebuild
    /// modes from the preference rule before flips are applied.
    fn mutate(&mut self, stops: &mut Vec<usize>, modes: &mut Vec<TransportMode>) {
        let catalog = self.evaluator.attractions().len();
        let mut flips = 0usize;
        let mut structural = false;

        for _ in 0..stops.len() {
            if !self.rng.gen_bool(self.params.mutation_rate) {
                continue;
            }
            match self.rng.gen_range(0..4) {
                0 => {
                    if stops.len() >= 2 {
                        let i = self.rng.gen_range(0..stops.len());
                        let j = self.rng.gen_range(0..stops.len());
                        stops.swap(i, j);
                        structural = true;
                    }
                }
                1 => {
                    if stops.len() < catalog {
                        let absent: Vec<usize> = (0..catalog)
                            .filter(|candidate| !stops.contains(candidate))
                            .collect();
                        let gene = absent[self.rng.gen_range(0..absent.len())];
                        let position = self.rng.gen_range(0..=stops.len());
                        stops.insert(position, gene);
                        structural = true;
                    }
                }
                2 => {
                    if stops.len() > 2 {
                        let position = self.rng.gen_range(0..stops.len());
                        stops.remove(position);
                        structural = true;
                    }
                }
                _ => flips += 1,
            }
        }

        if structural {
            *modes = self.evaluator.default_modes(stops);
        }
        for _ in 0..flips {
            if modes.is_empty() {
                break;
            }
            let leg = self.rng.gen_range(0..modes.len());
            modes[leg] = modes[leg].toggled();
        }
    }

    /// (μ+λ) elitist survival over an already-ranked combined population:
    /// fill front by front, truncating the overflowing front by descending
    /// crowding distance.
    fn select_survivors(&self, combined: Vec<Individual>) -> Vec<Individual> {
        let capacity = self.params.population_size;
        let mut by_rank: Vec<Vec<usize>> = Vec::new();
        for (index, individual) in combined.iter().enumerate() {
            if individual.rank >= by_rank.len() {
                by_rank.resize(individual.rank + 1, Vec::new());
            }
            by_rank[individual.rank].push(index);
        }

        let mut selected: Vec<usize> = Vec::with_capacity(capacity);
        for front in by_rank {
            if selected.len() == capacity {
                break;
            }
            if selected.len() + front.len() <= capacity {
                selected.extend(front);
            } else {
                let mut order = front;
                order.sort_by(|&x, &y| combined[y].crowding.total_cmp(&combined[x].crowding));
                order.truncate(capacity - selected.len());
                selected.extend(order);
            }
        }

        let keep: HashSet<usize> = selected.into_iter().collect();
        combined
            .into_iter()
            .enumerate()
            .filter(|(index, _)| keep.contains(index))
            .map(|(_, individual)| individual)
            .collect()
    }
}

/// Assign non-domination ranks and per-front crowding distances.
fn rank_population(individuals: &mut [Individual]) {
    let points: Vec<Point> = individuals.iter().map(Individual::point).collect();
    let fronts = ranking::fast_non_dominated_sort(&points);
    for (rank, front) in fronts.iter().enumerate() {
        let front_points: Vec<Point> = front.iter().map(|&index| points[index]).collect();
        let crowding = ranking::crowding_distance(&front_points);
        for (position, &index) in front.iter().enumerate() {
            individuals[index].rank = rank;
            individuals[index].crowding = crowding[position];
        }
    }
}
