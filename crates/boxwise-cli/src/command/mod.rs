use std::path::Path;

use anyhow::Context as _;
use boxwise_engine::{Outcome, StartPosition, random_board_size};
use boxwise_evaluator::genome::Genome;
use boxwise_training::evolution::BreedingPlan;
use clap::{Parser, Subcommand};
use rand::Rng;

use self::{
    breed::BreedArg, evolve::EvolveArg, make_dna::MakeDnaArg, play::PlayArg,
    select_move::SelectMoveArg, tourney::TourneyArg,
};
use crate::util::{BoardSize, parse_text_file};

mod breed;
mod evolve;
mod make_dna;
mod play;
mod select_move;
mod tourney;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fill a pool directory with random genomes
    MakeDna(#[clap(flatten)] MakeDnaArg),
    /// Play a round-robin tournament over a pool and save the results
    Tourney(#[clap(flatten)] TourneyArg),
    /// Breed the next pool from the results of the last tournament
    Breed(#[clap(flatten)] BreedArg),
    /// Alternate tournaments and breeding for several generations
    Evolve(#[clap(flatten)] EvolveArg),
    /// Play one game between two genomes and print its record
    Play(#[clap(flatten)] PlayArg),
    /// Choose a move for the side to move in a game record
    SelectMove(#[clap(flatten)] SelectMoveArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::MakeDna(arg) => make_dna::run(&arg)?,
        Mode::Tourney(arg) => tourney::run(&arg)?,
        Mode::Breed(arg) => breed::run(&arg)?,
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
        Mode::SelectMove(arg) => select_move::run(&arg)?,
    }
    Ok(())
}

#[derive(Default, Debug, Clone, clap::Args)]
struct TournamentArg {
    /// Board size as WIDTHxHEIGHT; random in 3..=8 per tournament if omitted
    #[arg(long)]
    size: Option<BoardSize>,
    /// Threads playing pairings
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

impl TournamentArg {
    fn board_size(&self) -> Option<(u8, u8)> {
        self.size.map(|size| (size.width, size.height))
    }

    fn start_position<R>(&self, rng: &mut R) -> anyhow::Result<StartPosition>
    where
        R: Rng + ?Sized,
    {
        let (width, height) = self.board_size().unwrap_or_else(|| random_board_size(rng));
        Ok(StartPosition::random(width, height, rng)?)
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
struct BreedingArg {
    /// Genomes carried over unchanged [default: a tenth of the pool]
    #[arg(long)]
    elites: Option<usize>,
    /// Random non-elites carried over unchanged [default: a tenth of the pool]
    #[arg(long)]
    lucky: Option<usize>,
    /// Probability of mutating a bred child
    #[arg(long)]
    mutation_rate: Option<f64>,
}

impl BreedingArg {
    fn plan(&self, pool_size: usize) -> anyhow::Result<BreedingPlan> {
        let scaled = BreedingPlan::scaled(pool_size);
        let plan = BreedingPlan {
            elite_count: self.elites.unwrap_or(scaled.elite_count),
            lucky_count: self.lucky.unwrap_or(scaled.lucky_count),
            mutation_rate: self.mutation_rate.unwrap_or(scaled.mutation_rate),
            ..scaled
        };
        plan.validate(pool_size)
            .with_context(|| format!("Invalid breeding plan for a pool of {pool_size}"))?;
        Ok(plan)
    }
}

/// Reads a DNA file, or falls back to [`Genome::TUNED`].
fn read_genome_or_tuned(path: Option<&Path>) -> anyhow::Result<Genome> {
    path.map_or(Ok(Genome::TUNED), |path| parse_text_file("DNA", path))
}

fn describe_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Winner(player) => format!("player {player} wins"),
        Outcome::Tie => "tie".to_owned(),
        Outcome::Undecided => "undecided".to_owned(),
    }
}
