//! The genome pool directory.
//!
//! ```text
//! pool/
//!   0.dna ... <n-1>.dna   one genome per file, best first after breeding
//!   count.txt             number of breeding steps so far
//!   results.csv           standings of the last tournament
//!   report-<g>.json       tournament report of generation <g>
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail, ensure};
use boxwise_evaluator::genome::Genome;
use boxwise_training::tournament::Standing;

use crate::util::{parse_text_file, read_text_file, write_text_file};

const COUNT_FILE: &str = "count.txt";
const RESULTS_FILE: &str = "results.csv";
const RESULTS_HEADER: &str = "DNA,Wins,Ties,Losses,Points";

#[derive(Debug, Clone)]
pub struct PoolDir {
    path: PathBuf,
}

impl PoolDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn genome_path(&self, index: usize) -> PathBuf {
        self.path.join(format!("{index}.dna"))
    }

    pub fn results_path(&self) -> PathBuf {
        self.path.join(RESULTS_FILE)
    }

    pub fn report_path(&self, generation: u64) -> PathBuf {
        self.path.join(format!("report-{generation}.json"))
    }

    pub fn has_genomes(&self) -> anyhow::Result<bool> {
        exists(&self.genome_path(0))
    }

    /// Reads `0.dna`, `1.dna`, ... up to the first missing file.
    pub fn read_genomes(&self) -> anyhow::Result<Vec<Genome>> {
        let mut genomes = vec![];
        loop {
            let path = self.genome_path(genomes.len());
            if !exists(&path)? {
                break;
            }
            genomes.push(parse_text_file("DNA", &path)?);
        }
        ensure!(
            !genomes.is_empty(),
            "No genome found in pool directory {} (expected 0.dna)",
            self.path.display()
        );
        tracing::debug!(pool = %self.path.display(), genomes = genomes.len(), "read pool");
        Ok(genomes)
    }

    /// Writes `genomes` as `0.dna` onwards and removes higher-numbered
    /// leftovers, so [`Self::read_genomes`] returns exactly `genomes`.
    pub fn write_genomes(&self, genomes: &[Genome]) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.path).with_context(|| {
            format!("Failed to create pool directory: {}", self.path.display())
        })?;
        for (index, genome) in genomes.iter().enumerate() {
            write_text_file("DNA", self.genome_path(index), &genome.to_string())?;
        }
        let mut index = genomes.len();
        loop {
            let path = self.genome_path(index);
            if !exists(&path)? {
                break;
            }
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove stale DNA file: {}", path.display()))?;
            index += 1;
        }
        tracing::debug!(pool = %self.path.display(), genomes = genomes.len(), "wrote pool");
        Ok(())
    }

    /// Breeding steps done so far; 0 if the counter file does not exist yet.
    pub fn read_generation(&self) -> anyhow::Result<u64> {
        let path = self.path.join(COUNT_FILE);
        if !exists(&path)? {
            return Ok(0);
        }
        let text = read_text_file("generation count", &path)?;
        text.trim()
            .parse()
            .with_context(|| format!("Failed to parse generation count file: {}", path.display()))
    }

    pub fn write_generation(&self, generation: u64) -> anyhow::Result<()> {
        write_text_file(
            "generation count",
            self.path.join(COUNT_FILE),
            &format!("{generation}\n"),
        )
    }

    pub fn write_results(&self, standings: &[Standing]) -> anyhow::Result<()> {
        write_text_file("results", self.results_path(), &format_results(standings))
    }

    /// Removes `results.csv`, which describes a pool that no longer exists
    /// once the genomes are replaced.
    pub fn remove_results(&self) -> anyhow::Result<()> {
        let path = self.results_path();
        if exists(&path)? {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove results file: {}", path.display()))?;
        }
        Ok(())
    }

    /// Standings from `results.csv`, indexed like a pool of `pool_size`.
    pub fn read_results(&self, pool_size: usize) -> anyhow::Result<Vec<Standing>> {
        let path = self.results_path();
        let text = read_text_file("results", &path)?;
        parse_results(&text)
            .and_then(|rows| standings_from_rows(&rows, pool_size))
            .with_context(|| format!("Invalid results file: {}", path.display()))
    }
}

fn exists(path: &Path) -> anyhow::Result<bool> {
    path.try_exists()
        .with_context(|| format!("Failed to access {}", path.display()))
}

/// One row of `results.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRow {
    pub dna: usize,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub points: u32,
}

pub fn format_results(standings: &[Standing]) -> String {
    let mut text = format!("{RESULTS_HEADER}\n");
    for (dna, standing) in standings.iter().enumerate() {
        text.push_str(&format!(
            "{dna},{},{},{},{}\n",
            standing.wins,
            standing.ties,
            standing.losses,
            standing.points()
        ));
    }
    text
}

pub fn parse_results(text: &str) -> anyhow::Result<Vec<ResultRow>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());
    match lines.next() {
        Some((_, RESULTS_HEADER)) => {}
        Some((n, line)) => bail!("line {n}: expected header {RESULTS_HEADER:?}, got {line:?}"),
        None => bail!("empty results table"),
    }
    lines
        .map(|(n, line)| parse_row(line).with_context(|| format!("line {n}: {line:?}")))
        .collect()
}

fn parse_row(line: &str) -> anyhow::Result<ResultRow> {
    let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
    let [dna, wins, ties, losses, points] = fields[..] else {
        bail!("expected 5 fields, got {}", fields.len());
    };
    let row = ResultRow {
        dna: dna.parse().context("invalid DNA number")?,
        wins: wins.parse().context("invalid win count")?,
        ties: ties.parse().context("invalid tie count")?,
        losses: losses.parse().context("invalid loss count")?,
        points: points.parse().context("invalid points")?,
    };
    ensure!(
        row.points == 2 * row.wins + row.ties,
        "points {} do not match 2 * {} wins + {} ties",
        row.points,
        row.wins,
        row.ties
    );
    Ok(row)
}

/// Checks DNA numbering against the pool: every genome needs exactly one row.
/// Rows for genomes outside the pool are skipped with a warning.
pub fn standings_from_rows(rows: &[ResultRow], pool_size: usize) -> anyhow::Result<Vec<Standing>> {
    let mut standings = vec![None; pool_size];
    for row in rows {
        let Some(slot) = standings.get_mut(row.dna) else {
            tracing::warn!(dna = row.dna, pool_size, "results row for a genome not in the pool");
            continue;
        };
        ensure!(slot.is_none(), "DNA {} appears more than once", row.dna);
        *slot = Some(Standing {
            wins: row.wins,
            ties: row.ties,
            losses: row.losses,
            games: row.wins + row.ties + row.losses,
            ..Standing::default()
        });
    }
    standings
        .into_iter()
        .enumerate()
        .map(|(dna, standing)| standing.with_context(|| format!("no result for DNA {dna}")))
        .collect()
}
