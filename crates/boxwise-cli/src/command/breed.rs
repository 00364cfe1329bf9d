use std::path::PathBuf;

use boxwise_training::evolution::{GenerationSummary, rank};

use super::BreedingArg;
use crate::{pool::PoolDir, util::SeedArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BreedArg {
    /// Pool directory holding the genomes and results.csv
    #[arg(long, default_value = "pool")]
    pool: PathBuf,
    #[clap(flatten)]
    breeding: BreedingArg,
    #[clap(flatten)]
    seed: SeedArg,
}

pub(crate) fn run(arg: &BreedArg) -> anyhow::Result<()> {
    let BreedArg {
        pool,
        breeding,
        seed,
    } = arg;
    let pool = PoolDir::new(pool);
    let genomes = pool.read_genomes()?;
    let standings = pool.read_results(genomes.len())?;
    let plan = breeding.plan(genomes.len())?;

    let ranking = rank(&genomes, &standings);
    let summary = GenerationSummary::from_ranking(&ranking);
    let ranked = ranking.iter().map(|r| r.genome).collect::<Vec<_>>();
    let next = plan.next_generation(&ranked, &mut seed.rng())?;
    pool.write_genomes(&next)?;
    pool.remove_results()?;
    let generation = pool.read_generation()? + 1;
    pool.write_generation(generation)?;

    eprintln!(
        "Bred generation #{generation} into {}",
        pool.path().display()
    );
    eprintln!(
        "  Parent points: min {} / mean {:.2} / max {}",
        summary.min_points, summary.mean_points, summary.max_points
    );
    eprintln!("  Mean weights: {:.3?}", summary.mean_weights.weights());
    eprintln!(
        "  Layout: {} elites, {} children, {} lucky, {} random",
        plan.elite_count,
        plan.children_count(),
        plan.lucky_count,
        next.len() - plan.required_slots()
    );
    Ok(())
}
