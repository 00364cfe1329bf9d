use std::path::PathBuf;

use anyhow::ensure;
use boxwise_training::breeding;

use crate::{pool::PoolDir, util::SeedArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MakeDnaArg {
    /// Pool directory
    #[arg(long, default_value = "pool")]
    pool: PathBuf,
    /// Number of genomes
    #[arg(long, default_value_t = 100)]
    count: usize,
    #[clap(flatten)]
    seed: SeedArg,
}

pub(crate) fn run(arg: &MakeDnaArg) -> anyhow::Result<()> {
    let MakeDnaArg { pool, count, seed } = arg;
    ensure!(*count > 0, "A pool needs at least one genome");

    let mut rng = seed.rng();
    let genomes = (0..*count)
        .map(|_| breeding::random_genome(&mut rng))
        .collect::<Vec<_>>();
    let pool = PoolDir::new(pool);
    pool.write_genomes(&genomes)?;
    pool.write_generation(0)?;
    pool.remove_results()?;

    eprintln!("Wrote {count} random genomes to {}", pool.path().display());
    Ok(())
}
