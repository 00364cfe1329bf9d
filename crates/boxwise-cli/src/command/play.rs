use std::path::PathBuf;

use boxwise_engine::{Player, StartPosition, random_board_size};
use boxwise_evaluator::{game_runner::play_game, move_selector::MoveSelector};

use super::{describe_outcome, read_genome_or_tuned};
use crate::util::{BoardSize, Output, SeedArg};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum StartKind {
    #[default]
    Random,
    Empty,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// DNA file of player 1, who moves first [default: the tuned genome]
    #[arg(long)]
    one: Option<PathBuf>,
    /// DNA file of player 2 [default: the tuned genome]
    #[arg(long)]
    two: Option<PathBuf>,
    /// Board size as WIDTHxHEIGHT; random in 3..=8 if omitted
    #[arg(long)]
    size: Option<BoardSize>,
    /// Start from a random position or an empty board
    #[arg(long, default_value = "random")]
    start: StartKind,
    /// Game record output path [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    seed: SeedArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        one,
        two,
        size,
        start,
        output,
        seed,
    } = arg;
    let genomes = [
        read_genome_or_tuned(one.as_deref())?,
        read_genome_or_tuned(two.as_deref())?,
    ];

    let mut rng = seed.rng();
    let (width, height) = size.map_or_else(
        || random_board_size(&mut rng),
        |size| (size.width, size.height),
    );
    let start = match start {
        StartKind::Random => StartPosition::random(width, height, &mut rng)?,
        StartKind::Empty => StartPosition::empty(width, height)?,
    };
    let [first, second] = genomes.map(MoveSelector::from_genome);
    let game = play_game(&start, [&first, &second], &mut rng);

    Output::to(output.as_deref())?.write_text(&game.record.to_string())?;

    eprintln!("{}", game.final_board);
    eprintln!(
        "Result: {} ({} to {}) after {} turns",
        describe_outcome(game.outcome),
        game.record.clocks[Player::One.index()].score,
        game.record.clocks[Player::Two.index()].score,
        game.turns
    );
    for player in Player::ALL {
        eprintln!(
            "  Player {player} thought for {:.3?}",
            game.think_time(player)
        );
    }
    Ok(())
}
