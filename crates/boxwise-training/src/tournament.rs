//! Round-robin tournaments between genomes.
//!
//! Every unordered pair `(i, j)` with `i <= j` is a pairing, so each genome
//! also meets itself. A pairing is two games from the same
//! [`StartPosition`]: in the first `i` plays [`Player::One`] and moves first,
//! in the second the roles are swapped. Both sides of every game are
//! recorded, which means a self-pairing contributes four results to one
//! genome's [`Standing`].
//!
//! # Parallelism
//!
//! Pairings are independent. Before any game starts, one seed per pairing is
//! drawn from the caller's generator; each pairing then plays with its own
//! [`Pcg32`] and its own copy of the board. Results are folded into the
//! standings in pairing order once every worker is done, so the outcome
//! depends only on the seed, never on the worker count. Think times are wall
//! clock measurements and are the one exception.

use std::{thread, time::Duration};

use boxwise_engine::{Outcome, Player, StartPosition};
use boxwise_evaluator::{game_runner::play_game, genome::Genome, move_selector::MoveSelector};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Accumulated results of one genome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub games: u32,
    /// Total wall-clock time spent selecting moves.
    pub think_time: Duration,
}

impl Standing {
    /// `2 * wins + ties`.
    #[must_use]
    pub const fn points(&self) -> u32 {
        2 * self.wins + self.ties
    }

    #[must_use]
    pub fn average_think_time(&self) -> Duration {
        if self.games == 0 {
            Duration::ZERO
        } else {
            self.think_time / self.games
        }
    }

    fn record(&mut self, outcome: Outcome, side: Player) {
        match outcome {
            Outcome::Winner(winner) if winner == side => self.wins += 1,
            Outcome::Winner(_) => self.losses += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::Undecided => unreachable!("finished game without a result"),
        }
        self.games += 1;
    }
}

/// The two games between `first` and `second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingResult {
    pub first: usize,
    pub second: usize,
    /// Outcome with `first` as [`Player::One`], then with `second` as
    /// [`Player::One`].
    pub outcomes: [Outcome; 2],
    /// Think time of `first` and of `second` over both games.
    pub think_time: [Duration; 2],
}

impl PairingResult {
    /// Side played by `first` in each of the two games.
    const FIRST_SIDES: [Player; 2] = [Player::One, Player::Two];

    /// Points `first` took from this pairing (0 to 4).
    #[must_use]
    pub fn points_for_first(&self) -> u32 {
        self.points_for(Self::FIRST_SIDES)
    }

    /// Points `second` took from this pairing (0 to 4).
    #[must_use]
    pub fn points_for_second(&self) -> u32 {
        self.points_for(Self::FIRST_SIDES.map(Player::opponent))
    }

    fn points_for(&self, sides: [Player; 2]) -> u32 {
        std::iter::zip(self.outcomes, sides)
            .map(|(outcome, side)| match outcome {
                Outcome::Winner(winner) if winner == side => 2,
                Outcome::Tie => 1,
                Outcome::Winner(_) | Outcome::Undecided => 0,
            })
            .sum()
    }
}

/// Standings per genome (indexed like the pool) and every pairing in play
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResult {
    pub standings: Vec<Standing>,
    pub pairings: Vec<PairingResult>,
}

impl TournamentResult {
    /// Folds pairing results into per-genome standings.
    #[must_use]
    pub fn from_pairings(pool_size: usize, pairings: Vec<PairingResult>) -> Self {
        let mut standings = vec![Standing::default(); pool_size];
        for pairing in &pairings {
            for (outcome, side) in std::iter::zip(pairing.outcomes, PairingResult::FIRST_SIDES) {
                standings[pairing.first].record(outcome, side);
                standings[pairing.second].record(outcome, side.opponent());
            }
            standings[pairing.first].think_time += pairing.think_time[0];
            standings[pairing.second].think_time += pairing.think_time[1];
        }
        Self {
            standings,
            pairings,
        }
    }

    /// Cross table: `matrix[i][j]` is the points genome `i` took against
    /// genome `j` (0 to 4). Off-diagonal cells of a pair sum to 4.
    #[must_use]
    pub fn pairing_matrix(&self) -> Vec<Vec<u32>> {
        let n = self.standings.len();
        let mut matrix = vec![vec![0; n]; n];
        for pairing in &self.pairings {
            let (i, j) = (pairing.first, pairing.second);
            matrix[i][j] = pairing.points_for_first();
            if i != j {
                matrix[j][i] = pairing.points_for_second();
            }
        }
        matrix
    }
}

/// Every pairing of a pool of `pool_size` genomes, self-pairs included.
///
/// ```
/// use boxwise_training::tournament::pairings;
///
/// assert_eq!(pairings(2), vec![(0, 0), (0, 1), (1, 1)]);
/// ```
#[must_use]
pub fn pairings(pool_size: usize) -> Vec<(usize, usize)> {
    (0..pool_size)
        .flat_map(|i| (i..pool_size).map(move |j| (i, j)))
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct PairingJob {
    first: usize,
    second: usize,
    seed: u64,
}

/// A round robin over one shared start position.
#[derive(Debug, Clone)]
pub struct Tournament {
    pub start: StartPosition,
    /// Number of threads playing pairings; 0 and 1 both mean sequential.
    pub workers: usize,
}

impl Tournament {
    #[must_use]
    pub fn new(start: StartPosition) -> Self {
        Self { start, workers: 1 }
    }

    /// Plays every pairing of `genomes`.
    pub fn run<R>(&self, genomes: &[Genome], rng: &mut R) -> TournamentResult
    where
        R: Rng + ?Sized,
    {
        let jobs = pairings(genomes.len())
            .into_iter()
            .map(|(first, second)| PairingJob {
                first,
                second,
                seed: rng.random(),
            })
            .collect::<Vec<_>>();
        tracing::info!(
            genomes = genomes.len(),
            pairings = jobs.len(),
            width = self.start.board.width(),
            height = self.start.board.height(),
            start_lines = self.start.lines.len(),
            workers = self.workers,
            "tournament started"
        );

        let results = if self.workers <= 1 {
            self.play_pairings(genomes, &jobs)
        } else {
            let chunk_size = jobs.len().div_ceil(self.workers).max(1);
            thread::scope(|s| {
                let handles = jobs
                    .chunks(chunk_size)
                    .map(|chunk| s.spawn(move || self.play_pairings(genomes, chunk)))
                    .collect::<Vec<_>>();
                handles
                    .into_iter()
                    .flat_map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                    })
                    .collect()
            })
        };

        let result = TournamentResult::from_pairings(genomes.len(), results);
        tracing::info!(games = 2 * result.pairings.len(), "tournament finished");
        result
    }

    fn play_pairings(&self, genomes: &[Genome], jobs: &[PairingJob]) -> Vec<PairingResult> {
        jobs.iter()
            .map(|job| self.play_pairing(genomes, job))
            .collect()
    }

    fn play_pairing(&self, genomes: &[Genome], job: &PairingJob) -> PairingResult {
        let mut rng = Pcg32::seed_from_u64(job.seed);
        let first = MoveSelector::from_genome(genomes[job.first]);
        let second = MoveSelector::from_genome(genomes[job.second]);
        let games = [
            play_game(&self.start, [&first, &second], &mut rng),
            play_game(&self.start, [&second, &first], &mut rng),
        ];
        let result = PairingResult {
            first: job.first,
            second: job.second,
            outcomes: [games[0].outcome, games[1].outcome],
            think_time: [
                games[0].think_time(Player::One) + games[1].think_time(Player::Two),
                games[0].think_time(Player::Two) + games[1].think_time(Player::One),
            ],
        };
        tracing::debug!(
            first = job.first,
            second = job.second,
            points = result.points_for_first(),
            "pairing finished"
        );
        result
    }
}
