//! Ranking a pool and breeding the next one.
//!
//! # Generation Step
//!
//! 1. Pick a board size (random unless fixed) and a random start position
//! 2. Run a [`Tournament`] over the pool
//! 3. [`rank`] the pool by points, keeping pool order among equals
//! 4. Log a [`GenerationSummary`]
//! 5. Assemble the next pool with [`BreedingPlan::next_generation`]
//!
//! # Next Pool Layout
//!
//! With the default plan on a pool of 100:
//!
//! | slots  | content                                                    |
//! |--------|------------------------------------------------------------|
//! | 0-9    | the 10 elites, unchanged                                   |
//! | 10-69  | each elite bred with 5 random elites and 1 random non-elite |
//! | 70-79  | 10 random non-elites, unchanged                             |
//! | 80-99  | fresh random genomes                                        |

use std::cmp::Reverse;

use boxwise_engine::{BoardSizeError, StartPosition, random_board_size};
use boxwise_evaluator::genome::Genome;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    breeding::{MUTATION_RATE, breed, random_genome},
    tournament::{Standing, Tournament, TournamentResult},
};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BreedingPlanError {
    #[display("cannot breed an empty pool")]
    EmptyPool,
    #[display("breeding plan needs at least one elite")]
    NoElites,
    #[display("breeding plan fills {required} slots but the pool has {pool_size}")]
    PoolTooSmall { required: usize, pool_size: usize },
    #[display("mutation rate {rate} is outside [0, 1]")]
    MutationRate { rate: f64 },
}

/// How the next pool is assembled from a ranked one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreedingPlan {
    /// Top genomes carried over unchanged.
    pub elite_count: usize,
    /// Children per elite with a random elite partner.
    pub elite_partners: usize,
    /// Children per elite with a random non-elite partner.
    pub outsider_partners: usize,
    /// Random non-elites carried over unchanged.
    pub lucky_count: usize,
    pub mutation_rate: f64,
}

impl Default for BreedingPlan {
    fn default() -> Self {
        Self {
            elite_count: 10,
            elite_partners: 5,
            outsider_partners: 1,
            lucky_count: 10,
            mutation_rate: MUTATION_RATE,
        }
    }
}

impl BreedingPlan {
    /// The default proportions fitted to `pool_size`: a tenth of the pool as
    /// elites (at least one), a tenth as lucky picks, and as many elite
    /// partners (up to 5) as the remaining slots allow.
    #[must_use]
    pub fn scaled(pool_size: usize) -> Self {
        let default = Self::default();
        let tenth = pool_size / 10;
        let elite_count = tenth.max(1).min(pool_size);
        let outsider_partners = usize::from(pool_size > elite_count);
        let lucky_count = tenth;
        let free = pool_size.saturating_sub(elite_count * (1 + outsider_partners) + lucky_count);
        Self {
            elite_count,
            elite_partners: (free / elite_count.max(1)).min(default.elite_partners),
            outsider_partners,
            lucky_count,
            mutation_rate: default.mutation_rate,
        }
    }

    /// Children bred per generation.
    #[must_use]
    pub fn children_count(&self) -> usize {
        self.elite_count * (self.elite_partners + self.outsider_partners)
    }

    /// Slots filled by elites, children and lucky picks.
    #[must_use]
    pub fn required_slots(&self) -> usize {
        self.elite_count + self.children_count() + self.lucky_count
    }

    pub fn validate(&self, pool_size: usize) -> Result<(), BreedingPlanError> {
        if pool_size == 0 {
            return Err(BreedingPlanError::EmptyPool);
        }
        if self.elite_count == 0 {
            return Err(BreedingPlanError::NoElites);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(BreedingPlanError::MutationRate {
                rate: self.mutation_rate,
            });
        }
        // A plan that fits leaves at least one non-elite for every draw.
        let required = self.required_slots();
        if required > pool_size {
            return Err(BreedingPlanError::PoolTooSmall {
                required,
                pool_size,
            });
        }
        Ok(())
    }

    /// Builds the next pool from `ranked`, best first. The result has the
    /// same size as `ranked`.
    pub fn next_generation<R>(
        &self,
        ranked: &[Genome],
        rng: &mut R,
    ) -> Result<Vec<Genome>, BreedingPlanError>
    where
        R: Rng + ?Sized,
    {
        self.validate(ranked.len())?;
        let (elites, outsiders) = ranked.split_at(self.elite_count);

        let mut next = Vec::with_capacity(ranked.len());
        next.extend_from_slice(elites);
        for elite in elites {
            for _ in 0..self.elite_partners {
                let partner = &elites[rng.random_range(0..elites.len())];
                next.push(breed(elite, partner, self.mutation_rate, rng));
            }
            for _ in 0..self.outsider_partners {
                let partner = &outsiders[rng.random_range(0..outsiders.len())];
                next.push(breed(elite, partner, self.mutation_rate, rng));
            }
        }
        for _ in 0..self.lucky_count {
            next.push(outsiders[rng.random_range(0..outsiders.len())]);
        }
        let bred = next.len();
        next.resize_with(ranked.len(), || random_genome(rng));

        tracing::debug!(
            elites = self.elite_count,
            children = self.children_count(),
            lucky = self.lucky_count,
            random = ranked.len() - bred,
            "bred next pool"
        );
        Ok(next)
    }
}

/// A genome with its tournament standing and its slot in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedGenome {
    pub index: usize,
    pub genome: Genome,
    pub standing: Standing,
}

/// Orders `genomes` by points, best first. Equal points keep pool order.
///
/// # Panics
///
/// Panics if `genomes` and `standings` differ in length.
#[must_use]
pub fn rank(genomes: &[Genome], standings: &[Standing]) -> Vec<RankedGenome> {
    assert_eq!(
        genomes.len(),
        standings.len(),
        "every genome needs a standing"
    );
    let mut ranking = std::iter::zip(genomes, standings)
        .enumerate()
        .map(|(index, (&genome, &standing))| RankedGenome {
            index,
            genome,
            standing,
        })
        .collect::<Vec<_>>();
    ranking.sort_by_key(|ranked| Reverse(ranked.standing.points()));
    ranking
}

/// Points spread and average weights of a ranked pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub min_points: u32,
    pub max_points: u32,
    pub mean_points: f64,
    pub mean_weights: Genome,
}

impl GenerationSummary {
    /// Summarises `ranking`; an empty ranking gives all zeros.
    #[must_use]
    pub fn from_ranking(ranking: &[RankedGenome]) -> Self {
        if ranking.is_empty() {
            return Self {
                min_points: 0,
                max_points: 0,
                mean_points: 0.0,
                mean_weights: Genome::ZERO,
            };
        }
        let points = || ranking.iter().map(|ranked| ranked.standing.points());
        #[expect(clippy::cast_precision_loss)]
        let n = ranking.len() as f64;
        Self {
            min_points: points().min().unwrap_or(0),
            max_points: points().max().unwrap_or(0),
            mean_points: points().map(f64::from).sum::<f64>() / n,
            mean_weights: Genome::from_fn(|gene| {
                ranking
                    .iter()
                    .map(|ranked| ranked.genome.weight(gene))
                    .sum::<f64>()
                    / n
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvolutionError {
    #[display("{_0}")]
    BoardSize(BoardSizeError),
    #[display("{_0}")]
    BreedingPlan(BreedingPlanError),
}

/// Everything one generation step produced.
#[derive(Debug, Clone)]
pub struct Generation {
    pub start: StartPosition,
    pub tournament: TournamentResult,
    pub ranking: Vec<RankedGenome>,
    pub summary: GenerationSummary,
    pub next_pool: Vec<Genome>,
}

/// Settings of a generation step.
#[derive(Debug, Clone)]
pub struct Evolution {
    pub plan: BreedingPlan,
    /// Fixed `(width, height)`; random per generation when `None`.
    pub board_size: Option<(u8, u8)>,
    /// Tournament worker threads.
    pub workers: usize,
}

impl Evolution {
    /// Sequential settings with a plan scaled to `pool_size`.
    #[must_use]
    pub fn for_pool(pool_size: usize) -> Self {
        Self {
            plan: BreedingPlan::scaled(pool_size),
            board_size: None,
            workers: 1,
        }
    }

    /// Plays a tournament over `pool` and breeds the next pool.
    pub fn run_generation<R>(
        &self,
        pool: &[Genome],
        rng: &mut R,
    ) -> Result<Generation, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        self.plan.validate(pool.len())?;
        let (width, height) = self.board_size.unwrap_or_else(|| random_board_size(rng));
        let tournament = Tournament {
            start: StartPosition::random(width, height, rng)?,
            workers: self.workers,
        };
        let result = tournament.run(pool, rng);

        let ranking = rank(pool, &result.standings);
        let summary = GenerationSummary::from_ranking(&ranking);
        tracing::info!(
            min_points = summary.min_points,
            max_points = summary.max_points,
            mean_points = summary.mean_points,
            mean_weights = ?summary.mean_weights.weights(),
            "ranked pool"
        );

        let ranked = ranking.iter().map(|ranked| ranked.genome).collect::<Vec<_>>();
        let next_pool = self.plan.next_generation(&ranked, rng)?;
        Ok(Generation {
            start: tournament.start,
            tournament: result,
            ranking,
            summary,
            next_pool,
        })
    }
}
