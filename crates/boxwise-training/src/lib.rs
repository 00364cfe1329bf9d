//! Evolving [`Genome`](boxwise_evaluator::genome::Genome) weights with a
//! genetic algorithm driven by round-robin tournaments.
//!
//! # How Training Works
//!
//! 1. **Pool** - start from a pool of genomes (random, or loaded from disk)
//! 2. **Tournament** - every pair of genomes, self-pairs included, plays two
//!    games from the same start position with roles swapped
//! 3. **Ranking** - genomes are ranked by points (`2 * wins + ties`)
//! 4. **Breeding** - the next pool is assembled from elites, their children,
//!    a few lucky survivors and fresh random genomes
//! 5. **Repeat** - one such cycle is a generation
//!
//! # Architecture
//!
//! ```text
//! Evolution (one generation: board, tournament, ranking, next pool)
//!     ↓ runs
//! Tournament (pairings, standings, pairing matrix)
//!     ↓ plays games with
//! Game runner (boxwise-evaluator)
//!     ↓ results rank the pool for
//! Breeding plan (elites, children, lucky picks, random fill)
//!     ↓ uses
//! Breeding operators (crossover, mutation, random genomes)
//! ```
//!
//! - [`breeding`] - genome-level operators
//! - [`tournament`] - round-robin play and per-genome standings
//! - [`evolution`] - ranking, the [`BreedingPlan`](evolution::BreedingPlan)
//!   and a whole generation step
//!
//! # Reproducibility
//!
//! Every function takes its random source explicitly. The tournament draws a
//! seed per pairing from the caller's generator before any game is played, so
//! the results do not depend on how many worker threads run the pairings.
//!
//! # Example
//!
//! ```
//! use boxwise_training::{breeding, evolution::Evolution};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(7);
//! let pool = (0..4).map(|_| breeding::random_genome(&mut rng)).collect::<Vec<_>>();
//! let evolution = Evolution {
//!     board_size: Some((3, 3)),
//!     ..Evolution::for_pool(pool.len())
//! };
//! let generation = evolution.run_generation(&pool, &mut rng).unwrap();
//! assert_eq!(generation.next_pool.len(), pool.len());
//! ```

pub mod breeding;
pub mod evolution;
pub mod tournament;
