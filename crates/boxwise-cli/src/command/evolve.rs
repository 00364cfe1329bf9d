use std::path::PathBuf;

use boxwise_training::{
    breeding,
    evolution::{Evolution, Generation},
};

use super::{BreedingArg, TournamentArg};
use crate::{
    pool::PoolDir,
    report::TournamentReport,
    util::{Output, SeedArg},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Pool directory
    #[arg(long, default_value = "pool")]
    pool: PathBuf,
    /// Generations to run
    #[arg(long, default_value_t = 10)]
    generations: u64,
    /// Start from this many random genomes if the pool is empty
    #[arg(long)]
    population: Option<usize>,
    #[clap(flatten)]
    tournament: TournamentArg,
    #[clap(flatten)]
    breeding: BreedingArg,
    #[clap(flatten)]
    seed: SeedArg,
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let EvolveArg {
        pool,
        generations,
        population,
        tournament,
        breeding,
        seed,
    } = arg;
    let pool = PoolDir::new(pool);
    let mut rng = seed.rng();

    let mut genomes = match population {
        Some(count) if !pool.has_genomes()? => {
            let genomes = (0..*count)
                .map(|_| breeding::random_genome(&mut rng))
                .collect::<Vec<_>>();
            pool.write_genomes(&genomes)?;
            pool.write_generation(0)?;
            pool.remove_results()?;
            tracing::info!(count, pool = %pool.path().display(), "created random pool");
            genomes
        }
        _ => {
            let genomes = pool.read_genomes()?;
            if let Some(requested) = ignored_population(*population, genomes.len()) {
                tracing::warn!(
                    requested,
                    loaded = genomes.len(),
                    pool = %pool.path().display(),
                    "pool already holds genomes, ignoring --population"
                );
            }
            genomes
        }
    };
    let evolution = Evolution {
        plan: breeding.plan(genomes.len())?,
        board_size: tournament.board_size(),
        workers: tournament.workers,
    };

    let mut generation = pool.read_generation()?;
    for _ in 0..*generations {
        tracing::info!(generation, genomes = genomes.len(), "generation started");
        let Generation {
            start,
            tournament: result,
            ranking,
            summary,
            next_pool,
        } = evolution.run_generation(&genomes, &mut rng)?;

        pool.write_results(&result.standings)?;
        let report = TournamentReport::new(generation, &start, &genomes, &result);
        Output::create(&pool.report_path(generation))?.write_json(&report)?;

        eprintln!(
            "Generation #{generation} on {}x{}: points min {} / mean {:.2} / max {}, best DNA {}",
            report.width,
            report.height,
            summary.min_points,
            summary.mean_points,
            summary.max_points,
            ranking[0].index
        );

        genomes = next_pool;
        pool.write_genomes(&genomes)?;
        pool.remove_results()?;
        generation += 1;
        pool.write_generation(generation)?;
    }

    eprintln!();
    eprintln!("Evolution finished at generation #{generation}");
    eprintln!("  Pool: {}", pool.path().display());
    eprintln!("  Best genome of the last tournament (0.dna):");
    for line in genomes[0].to_string().lines() {
        eprintln!("    {line}");
    }
    Ok(())
}

/// The requested population if it differs from the size of the loaded pool.
fn ignored_population(requested: Option<usize>, loaded: usize) -> Option<usize> {
    requested.filter(|&count| count != loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_population() {
        assert_eq!(ignored_population(None, 100), None);
        assert_eq!(ignored_population(Some(100), 100), None);
        assert_eq!(ignored_population(Some(20), 100), Some(20));
    }
}
