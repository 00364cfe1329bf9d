use std::path::PathBuf;

use anyhow::{Context as _, ensure};
use boxwise_engine::{GameRecord, Player};
use boxwise_evaluator::move_selector::MoveSelector;

use super::read_genome_or_tuned;
use crate::util::{Output, SeedArg, parse_text_file};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SelectMoveArg {
    /// Game record to continue
    record: PathBuf,
    /// DNA file of the side to move [default: the tuned genome]
    #[arg(long)]
    dna: Option<PathBuf>,
    /// Also write the record with the chosen move appended to this path
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    seed: SeedArg,
}

pub(crate) fn run(arg: &SelectMoveArg) -> anyhow::Result<()> {
    let SelectMoveArg {
        record: record_path,
        dna,
        output,
        seed,
    } = arg;
    let genome = read_genome_or_tuned(dna.as_deref())?;
    let record: GameRecord = parse_text_file("game record", record_path)?;
    let mut state = record
        .replay()
        .with_context(|| format!("Failed to replay game record: {}", record_path.display()))?;
    ensure!(
        !state.is_over(),
        "The game in {} is already over",
        record_path.display()
    );

    let mover = state.to_move();
    let selected = MoveSelector::from_genome(genome).select_for_state(&state, &mut seed.rng());
    Output::stdout().write_text(&format!("{}\n", selected.mv))?;

    state.play(selected.mv);
    eprintln!("{}", state.board());
    eprintln!(
        "Player {mover} draws {} (score {:.3}), closing {} cell(s); score {} to {}",
        selected.mv,
        selected.score,
        selected.completed.len(),
        state.score(Player::One),
        state.score(Player::Two)
    );

    if let Some(path) = output {
        let mut next = record;
        next.push(mover.into(), selected.mv);
        next.to_move = state.to_move();
        next.clocks = state.clocks();
        Output::create(path)?.write_text(&next.to_string())?;
        eprintln!("Updated record saved to {}", path.display());
    }
    Ok(())
}
