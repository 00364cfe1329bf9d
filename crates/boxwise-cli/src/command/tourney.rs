use std::path::PathBuf;

use boxwise_training::tournament::Tournament;

use super::TournamentArg;
use crate::{
    pool::PoolDir,
    report::TournamentReport,
    util::{Output, SeedArg},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TourneyArg {
    /// Pool directory
    #[arg(long, default_value = "pool")]
    pool: PathBuf,
    /// JSON report path [default: <pool>/report-<generation>.json]
    #[arg(long)]
    report: Option<PathBuf>,
    #[clap(flatten)]
    tournament: TournamentArg,
    #[clap(flatten)]
    seed: SeedArg,
}

pub(crate) fn run(arg: &TourneyArg) -> anyhow::Result<()> {
    let TourneyArg {
        pool,
        report,
        tournament,
        seed,
    } = arg;
    let pool = PoolDir::new(pool);
    let genomes = pool.read_genomes()?;
    let generation = pool.read_generation()?;

    let mut rng = seed.rng();
    let start = tournament.start_position(&mut rng)?;
    let result = Tournament {
        start: start.clone(),
        workers: tournament.workers,
    }
    .run(&genomes, &mut rng);

    pool.write_results(&result.standings)?;
    let summary = TournamentReport::new(generation, &start, &genomes, &result);
    let report_path = report.clone().unwrap_or_else(|| pool.report_path(generation));
    Output::create(&report_path)?.write_json(&summary)?;
    Output::stdout().write_text(&summary.to_string())?;

    eprintln!();
    eprintln!("Results saved to {}", pool.results_path().display());
    eprintln!("Report saved to {}", report_path.display());
    Ok(())
}
